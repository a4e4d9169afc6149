//! Server-rendered page shells for the prerendered routes.
//!
//! Each route gets a crawlable shell: title and description tags for the
//! head, plus site navigation, a heading, intro copy and topic sections for
//! the body. The client bundle takes over after load.

use leptos::prelude::*;

use super::{PageRenderer, PrerenderError, RenderedPage};

pub const SITE_NAME: &str = "AgriFact";

/// Static copy for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub path: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub heading: &'static str,
    pub intro: &'static str,
    pub sections: &'static [(&'static str, &'static str)],
}

const NAV: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/fact-check", "Check a claim"),
    ("/myths", "Common myths"),
    ("/videos", "Videos"),
    ("/resources", "Resources"),
    ("/about", "About"),
];

pub const PAGES: &[PageMeta] = &[
    PageMeta {
        path: "/",
        title: "AgriFact | Farming facts, not rumours",
        description: "Check agricultural claims about crops, soil, fertilizers and pesticides before acting on them.",
        heading: "Farming facts, not rumours",
        intro: "Type or speak a claim you heard about farming and get a verdict backed by agricultural science, in your language.",
        sections: &[
            ("Ask in your language", "Claims can be checked in English, Hindi, Tamil, Telugu, Marathi and more."),
            ("Listen to the answer", "Every verdict can be read aloud for farmers who prefer audio."),
        ],
    },
    PageMeta {
        path: "/fact-check",
        title: "Check a claim | AgriFact",
        description: "Submit an agricultural claim and receive a true, false or inconclusive verdict with a credible source.",
        heading: "Check a farming claim",
        intro: "Enter a claim about seeds, soil, fertilizer, pest control, irrigation or livestock.",
        sections: &[
            ("How verdicts work", "Each claim is compared against agronomic research and extension guidance."),
            ("Sources", "Verdicts cite agricultural universities, extension services or ministries."),
        ],
    },
    PageMeta {
        path: "/myths",
        title: "Common farming myths | AgriFact",
        description: "Widespread agricultural misinformation, explained and corrected.",
        heading: "Common farming myths",
        intro: "Claims that circulate on messaging apps and at markets, with what the evidence says.",
        sections: &[
            ("More urea means more yield", "Excess nitrogen raises costs, burns crops and pollutes groundwater."),
            ("Burning stubble enriches soil", "Burning destroys organic matter and soil microbes and harms air quality."),
        ],
    },
    PageMeta {
        path: "/videos",
        title: "Explainer videos | AgriFact",
        description: "Short explainer videos that debunk common agricultural myths.",
        heading: "Explainer videos",
        intro: "Watch short videos on soil health, pest management and safe pesticide use.",
        sections: &[],
    },
    PageMeta {
        path: "/resources",
        title: "Resources | AgriFact",
        description: "Trusted agricultural references: extension services, research institutes and helplines.",
        heading: "Trusted resources",
        intro: "Where to find reliable agricultural advice near you.",
        sections: &[
            ("Extension services", "Local extension centres offer free advice on crops and inputs."),
            ("Soil testing", "A soil test tells you which nutrients your field actually needs."),
        ],
    },
    PageMeta {
        path: "/about",
        title: "About | AgriFact",
        description: "Why AgriFact exists and how it checks agricultural claims.",
        heading: "About AgriFact",
        intro: "AgriFact helps farmers separate sound agricultural advice from misinformation.",
        sections: &[],
    },
    PageMeta {
        path: "/contact",
        title: "Contact | AgriFact",
        description: "Get in touch with the AgriFact team.",
        heading: "Contact us",
        intro: "Report a claim we got wrong or suggest a topic for a new explainer.",
        sections: &[],
    },
    PageMeta {
        path: "/privacy",
        title: "Privacy policy | AgriFact",
        description: "How AgriFact handles the claims and voice recordings you submit.",
        heading: "Privacy policy",
        intro: "Claims and recordings are sent to our AI provider to produce a verdict and are not sold or shared.",
        sections: &[],
    },
];

/// Look up the copy for a route. Trailing slashes are ignored.
#[must_use]
pub fn page_for(url: &str) -> Option<&'static PageMeta> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { "/" } else { trimmed };
    PAGES.iter().find(|p| p.path == normalized)
}

// =============================================================================
// COMPONENTS
// =============================================================================

#[component]
fn SiteNav(current: &'static str) -> impl IntoView {
    view! {
        <nav class="site-nav" aria-label="Main">
            {NAV
                .iter()
                .map(|&(href, label)| {
                    let aria_current = (href == current).then_some("page");
                    view! { <a href=href aria-current=aria_current>{label}</a> }
                })
                .collect_view()}
        </nav>
    }
}

#[component]
fn PageShell(page: PageMeta) -> impl IntoView {
    view! {
        <header class="site-header">
            <a class="site-brand" href="/">{SITE_NAME}</a>
            <SiteNav current={page.path} />
        </header>
        <main id="main" class="page">
            <h1>{page.heading}</h1>
            <p class="page-intro">{page.intro}</p>
            {page
                .sections
                .iter()
                .map(|&(title, body)| {
                    view! {
                        <section class="page-section">
                            <h2>{title}</h2>
                            <p>{body}</p>
                        </section>
                    }
                })
                .collect_view()}
        </main>
        <footer class="site-footer">
            <p>{SITE_NAME}" helps farmers check claims before acting on them."</p>
        </footer>
    }
}

#[component]
fn PageHead(page: PageMeta) -> impl IntoView {
    view! {
        <title>{page.title}</title>
        <meta name="description" content={page.description} />
        <meta {leptos::tachys::html::attribute::custom::custom_attribute("property", "og:title")} content={page.title} />
        <meta {leptos::tachys::html::attribute::custom::custom_attribute("property", "og:description")} content={page.description} />
        <link rel="canonical" href={page.path} />
    }
}

// =============================================================================
// RENDERER
// =============================================================================

/// Renders [`PAGES`] with Leptos SSR.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeptosRenderer;

impl PageRenderer for LeptosRenderer {
    fn render(&self, url: &str) -> Result<RenderedPage, PrerenderError> {
        let page = *page_for(url).ok_or_else(|| PrerenderError::UnknownRoute(url.to_string()))?;
        let head = view! { <PageHead page=page /> }.to_html();
        let html = view! { <PageShell page=page /> }.to_html();
        Ok(RenderedPage { head, html })
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
