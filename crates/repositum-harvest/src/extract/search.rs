use scraper::Html;

use crate::error::Result;
use crate::extract::{element_text, parse_selector};

/// Item links from the `table.table-hover` result table whose href starts
/// with `prefix`, in page order.
pub fn result_links(document: &Html, prefix: &str) -> Result<Vec<String>> {
    let table_selector = parse_selector("table.table.table-hover")?;
    let link_selector = parse_selector("a[href]")?;

    let Some(table) = document.select(&table_selector).next() else {
        return Ok(Vec::new());
    };
    Ok(table
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.starts_with(prefix))
        .map(str::to_string)
        .collect())
}

/// Href of the "Next" control in the `ul.pagination.pull-right` list.
pub fn next_page_href(document: &Html) -> Result<Option<String>> {
    let list_selector = parse_selector("ul.pagination.pull-right")?;
    let link_selector = parse_selector("a[href]")?;

    let Some(list) = document.select(&list_selector).next() else {
        return Ok(None);
    };
    Ok(list
        .select(&link_selector)
        .find(|a| element_text(a) == "Next")
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <table class="table table-hover">
            <tr><td><a href="/handle/20.500.12708/101">First thesis</a></td>
                <td><a href="/browse?type=author&value=Doe">Doe</a></td></tr>
            <tr><td><a href="/handle/20.500.12708/102">Second thesis</a></td></tr>
            <tr><td><a>no href</a></td></tr>
          </table>
          <ul class="pagination pull-right">
            <li><a href="/simple-search?start=0">1</a></li>
            <li><a href="/simple-search?start=50">Next</a></li>
          </ul>
        </body></html>"#;

    #[test]
    fn collects_prefixed_links_in_order() {
        let document = Html::parse_document(RESULTS_PAGE);
        assert_eq!(
            result_links(&document, "/handle/").unwrap(),
            ["/handle/20.500.12708/101", "/handle/20.500.12708/102"]
        );
    }

    #[test]
    fn missing_table_yields_no_links() {
        let document = Html::parse_document("<table class=\"table\"><a href=\"/handle/1\">x</a></table>");
        assert!(result_links(&document, "/handle/").unwrap().is_empty());
    }

    #[test]
    fn finds_next_control() {
        let document = Html::parse_document(RESULTS_PAGE);
        assert_eq!(
            next_page_href(&document).unwrap().as_deref(),
            Some("/simple-search?start=50")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let document = Html::parse_document(
            r#"<ul class="pagination pull-right"><li><a href="/s?start=0">Previous</a></li></ul>"#,
        );
        assert_eq!(next_page_href(&document).unwrap(), None);
        let no_pagination = Html::parse_document("<p>Next</p>");
        assert_eq!(next_page_href(&no_pagination).unwrap(), None);
    }
}
