//! Read-only content pages

use super::Page;
use agency_router::RouteId;
use maud::{html, Markup};

pub const BLOG: Page = Page::read_only(
    RouteId::Blog,
    "Blog - Digital Transformation Insights",
    "Stay updated with the latest trends in digital transformation, web development, and technology insights from our expert team.",
    blog,
);

pub const CAREERS: Page = Page::read_only(
    RouteId::Careers,
    "Careers - Join Kaizen Digital Solutions",
    "Open positions at Kaizen Digital Solutions in engineering, marketing, and design.",
    careers,
);

const POSTS: [(&str, &str); 3] = [
    ("The Future of Web Development in 2025", "Technology"),
    ("Digital Transformation: A Complete Guide", "Business"),
    ("SEO Best Practices for 2025", "Marketing"),
];

const POSITIONS: [(&str, &str, &str); 3] = [
    ("Senior Full Stack Developer", "Engineering", "Remote / Hybrid"),
    ("Digital Marketing Specialist", "Marketing", "Remote"),
    ("UI/UX Designer", "Design", "Remote / Hybrid"),
];

fn blog() -> Markup {
    html! {
        section.hero {
            h1 { "Blog & " span.highlight { "Resources" } }
        }
        section.posts {
            @for (title, category) in POSTS {
                article {
                    span.category { (category) }
                    h2 { (title) }
                }
            }
        }
    }
}

fn careers() -> Markup {
    html! {
        section.hero {
            h1 { "Join Our " span.highlight { "Team" } }
        }
        section {
            h2 { "Open Positions" }
            @for (title, department, location) in POSITIONS {
                article.position {
                    h3 { (title) }
                    p { (department) " · " (location) }
                }
            }
        }
    }
}
