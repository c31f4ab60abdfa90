use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::extract::{element_text, parse_selector};

const INVALID_IDENTIFIER: &str = "Invalid Identifier";

/// Whether the page is DSpace's "Invalid Identifier" error page.
pub fn is_invalid_identifier(document: &Html) -> Result<bool> {
    let h1 = parse_selector("h1")?;
    Ok(document
        .select(&h1)
        .any(|heading| element_text(&heading) == INVALID_IDENTIFIER))
}

/// `div#wrapperDisplayItem`, the item display wrapper.
pub fn display_wrapper(document: &Html) -> Result<Option<ElementRef<'_>>> {
    let selector = parse_selector("div#wrapperDisplayItem")?;
    Ok(document.select(&selector).next())
}

/// First `div.row` below the wrapper, in document order. This may itself be
/// a metadata row, in which case it holds no metadata rows of its own.
pub fn row_container<'a>(wrapper: ElementRef<'a>) -> Result<Option<ElementRef<'a>>> {
    let selector = parse_selector("div.row")?;
    Ok(wrapper.select(&selector).next())
}

pub fn metadata_rows<'a>(region: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>> {
    let selector = parse_selector("div.row.metadata-row")?;
    Ok(region.select(&selector).collect())
}

/// Href of the primary action button, which links to the full item record.
pub fn full_record_href(document: &Html) -> Result<Option<String>> {
    let selector = parse_selector("a.btn.btn-primary")?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|button| button.value().attr("href"))
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM_PAGE: &str = r#"
        <html><body>
          <a class="btn btn-primary" href="/handle/20.500.12708/42?mode=full">Show full item record</a>
          <div id="wrapperDisplayItem">
            <div class="row">
              <div class="row metadata-row">
                <div class="metadataFieldLabel">dc.title</div>
                <div class="metadataFieldValue">A</div>
              </div>
              <div class="row metadata-row">
                <div class="metadataFieldLabel">dc.type</div>
                <div class="metadataFieldValue">B</div>
              </div>
            </div>
          </div>
        </body></html>"#;

    #[test]
    fn finds_wrapper_container_and_rows() {
        let document = Html::parse_document(ITEM_PAGE);
        let wrapper = display_wrapper(&document).unwrap().unwrap();
        let container = row_container(wrapper).unwrap().unwrap();
        assert_eq!(container.value().attr("class"), Some("row"));
        assert_eq!(metadata_rows(container).unwrap().len(), 2);
    }

    #[test]
    fn container_is_first_row_even_if_metadata_row() {
        let document = Html::parse_document(
            r#"<div id="wrapperDisplayItem">
                 <div class="row metadata-row">
                   <div class="metadataFieldLabel">dc.title</div>
                   <div class="metadataFieldValue">A</div>
                 </div>
               </div>"#,
        );
        let wrapper = display_wrapper(&document).unwrap().unwrap();
        let container = row_container(wrapper).unwrap().unwrap();
        assert_eq!(container.value().attr("class"), Some("row metadata-row"));
        assert!(metadata_rows(container).unwrap().is_empty());
    }

    #[test]
    fn full_record_button_href() {
        let document = Html::parse_document(ITEM_PAGE);
        assert_eq!(
            full_record_href(&document).unwrap().as_deref(),
            Some("/handle/20.500.12708/42?mode=full")
        );
        let bare = Html::parse_document("<a class=\"btn\" href=\"/x\">x</a>");
        assert_eq!(full_record_href(&bare).unwrap(), None);
    }

    #[test]
    fn detects_invalid_identifier_heading() {
        let page = Html::parse_document("<h1>\n  Invalid Identifier\n</h1>");
        assert!(is_invalid_identifier(&page).unwrap());
        let item = Html::parse_document(ITEM_PAGE);
        assert!(!is_invalid_identifier(&item).unwrap());
    }
}
