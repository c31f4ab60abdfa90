//! Degree name from the title page of a thesis.
//!
//! Title pages say "... in partial fulfillment of the requirements for the
//! degree of <DEGREE> by <AUTHOR>" or, in German, "... im Rahmen des Studiums
//! <DEGREE> eingereicht von <AUTHOR>". PDF text extraction scatters spaces
//! inside words, so all whitespace is removed first and the markers are
//! matched without spaces.

/// Whitespace-free markers enclosing the degree name in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPair {
    pub language: &'static str,
    pub opening: &'static str,
    pub closing: &'static str,
}

/// Tried in order; the first opening marker found decides.
pub const DEFAULT_ANCHORS: &[AnchorPair] = &[
    AnchorPair {
        language: "en",
        opening: "degreeof",
        closing: "by",
    },
    AnchorPair {
        language: "de",
        opening: "desStudiums",
        closing: "eingereichtvon",
    },
];

/// Extracts the degree name (without whitespace) using [`DEFAULT_ANCHORS`].
pub fn extract_degree(raw_text: &str) -> Option<String> {
    extract_degree_with(raw_text, DEFAULT_ANCHORS)
}

/// Extracts the text between the first matching anchor pair.
///
/// The closing marker is searched from the start of the text, not from the
/// end of the opening marker. When it is missing or occurs before the
/// opening marker ends the window is empty and `None` is returned.
pub fn extract_degree_with(raw_text: &str, anchors: &[AnchorPair]) -> Option<String> {
    let text = strip_whitespace(raw_text);
    let anchor = anchors.iter().find(|a| text.contains(a.opening))?;

    let start = text.find(anchor.opening)? + anchor.opening.len();
    let end = text.find(anchor.closing)?;
    if end <= start {
        tracing::debug!(
            language = anchor.language,
            start,
            end,
            "closing marker precedes degree window"
        );
        return None;
    }
    Some(text[start..end].to_string())
}

fn strip_whitespace(text: &str) -> String {
    text.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_title_page() {
        let text = "Verleihung des akademischen Grades degree of Master of Science by the Faculty";
        assert_eq!(extract_degree(text).as_deref(), Some("MasterofScience"));
    }

    #[test]
    fn german_title_page() {
        let text = "DIPLOMARBEIT\nausgeführt zum Zwecke der Erlangung im Rahmen des Studiums\n\
                    Informatik\neingereicht von\nMax Mustermann";
        assert_eq!(extract_degree(text).as_deref(), Some("Informatik"));
    }

    #[test]
    fn german_stripped_fragment() {
        assert_eq!(
            extract_degree("xxdesStudiumsInformatikeingereichtvonyy").as_deref(),
            Some("Informatik")
        );
    }

    #[test]
    fn spaces_inside_words_do_not_matter() {
        let clean = "submitted for the degree of Diplom-Ingenieur by Jane Doe";
        let noisy = "sub mitted for the de gree  of Dip lom-Inge nieur\tb y Ja ne Doe";
        assert_eq!(extract_degree(noisy), extract_degree(clean));
        assert_eq!(extract_degree(noisy).as_deref(), Some("Diplom-Ingenieur"));
    }

    #[test]
    fn no_anchor_is_none() {
        assert_eq!(extract_degree("A thesis about graphs and their colourings"), None);
        assert_eq!(extract_degree(""), None);
    }

    #[test]
    fn english_wins_over_german() {
        let text = "des Studiums Informatik eingereicht von ... degree of Doctor of Philosophy by X";
        assert_eq!(extract_degree(text).as_deref(), Some("DoctorofPhilosophy"));
    }

    #[test]
    fn closing_before_opening_is_none() {
        assert_eq!(extract_degree("written by someone for the degree of Master"), None);
    }

    #[test]
    fn missing_closing_is_none() {
        assert_eq!(extract_degree("the degree of Master of Science"), None);
    }

    #[test]
    fn custom_anchor_list() {
        let anchors = [AnchorPair {
            language: "fr",
            opening: "diplômede",
            closing: "présentépar",
        }];
        assert_eq!(
            extract_degree_with("pour le diplôme de Ingénieur présenté par Marie", &anchors)
                .as_deref(),
            Some("Ingénieur")
        );
    }
}
