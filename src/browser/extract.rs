//! Content extraction from the rendered document

use crate::browser::error::BrowserError;
use crate::browser::{ListKind, PageContent, PageImage, PageLink, PageList};
use scraper::{Html, Selector};
use tracing::instrument;
use url::Url;

fn selector(raw: &str) -> Result<Selector, BrowserError> {
    Selector::parse(raw)
        .map_err(|e| BrowserError::HtmlParse(format!("Failed to parse selector '{}': {}", raw, e)))
}

/// Extract SEO-relevant content from a rendered document
///
/// Selects, in document order: the document title, the description meta tag,
/// every heading at levels 1-6, paragraph text, lists with their items,
/// links with hrefs resolved against the page URL, and image alt text.
///
/// # Arguments
///
/// * `url` - The URL the document was loaded from, used to resolve links
/// * `html` - The rendered document HTML
///
/// # Returns
///
/// The extracted page content
#[instrument(skip(html))]
pub fn extract_page_content(url: &str, html: &str) -> Result<PageContent, BrowserError> {
    let document = Html::parse_document(html);
    let base = Url::parse(url)?;

    let title = document
        .select(&selector("title")?)
        .next()
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default();

    let meta_description = document
        .select(&selector("meta[name='description']")?)
        .next()
        .and_then(|element| element.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    let mut headings: [Vec<String>; 6] = Default::default();
    for (index, level) in headings.iter_mut().enumerate() {
        let heading_selector = selector(&format!("h{}", index + 1))?;
        *level = document
            .select(&heading_selector)
            .map(|element| element.text().collect::<String>())
            .collect();
    }

    let paragraphs = document
        .select(&selector("p")?)
        .map(|element| element.text().collect::<String>())
        .collect();

    let item_selector = selector("li")?;
    let lists = document
        .select(&selector("ul, ol")?)
        .map(|list| PageList {
            kind: if list.value().name() == "ol" {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            },
            items: list
                .select(&item_selector)
                .map(|item| item.text().collect::<String>())
                .collect(),
        })
        .collect();

    let links = document
        .select(&selector("a")?)
        .map(|anchor| {
            let raw_href = anchor.value().attr("href").unwrap_or_default();
            let href = base
                .join(raw_href)
                .map(|resolved| resolved.to_string())
                .unwrap_or_else(|_| raw_href.to_string());
            PageLink {
                href,
                text: anchor.text().collect::<String>(),
            }
        })
        .collect();

    let images = document
        .select(&selector("img")?)
        .map(|image| PageImage {
            alt: image.value().attr("alt").unwrap_or_default().to_string(),
        })
        .collect();

    Ok(PageContent {
        title,
        meta_description,
        headings,
        paragraphs,
        lists,
        links,
        images,
    })
}
