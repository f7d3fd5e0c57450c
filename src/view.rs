//! Server-rendered review form.
use ammonia::clean_text;

use crate::classification::TopicPrediction;

/// What the page shows below the form.
#[derive(Debug, Clone, Copy)]
pub enum PageState<'a> {
    Empty,
    Result {
        review: &'a str,
        prediction: &'a TopicPrediction,
    },
    Error {
        message: &'a str,
    },
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Product Review Topic Analyzer</title>
<style>
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
textarea { width: 100%; min-height: 8rem; }
.result { margin-top: 1.5rem; padding: 1rem; border: 1px solid #9c9; background: #f3fff3; }
.error { margin-top: 1.5rem; padding: 1rem; border: 1px solid #c99; background: #fff3f3; }
</style>
</head>
<body>
<h1>Product Review Topic Analyzer</h1>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Renders the full page. Submitted text and error messages are escaped; topic labels and
/// categories come from the fixed catalog and are embedded as-is.
#[must_use]
pub fn render_page(state: &PageState<'_>) -> String {
    let mut page = String::with_capacity(2048);
    page.push_str(HEAD);

    let review = match state {
        PageState::Result { review, .. } => clean_text(review),
        PageState::Empty | PageState::Error { .. } => String::new(),
    };
    page.push_str(&format!(
        "<form method=\"post\" action=\"/analyze\">\n\
         <label for=\"review\">Enter a product review</label>\n\
         <textarea id=\"review\" name=\"review\">{review}</textarea>\n\
         <button type=\"submit\">Analyze</button>\n\
         </form>\n"
    ));

    match state {
        PageState::Empty => {}
        PageState::Result { prediction, .. } => {
            page.push_str(&format!(
                "<div class=\"result\">\n\
                 <p>Predicted topic: <strong>{}</strong></p>\n\
                 <p>Category: <strong>{}</strong></p>\n\
                 </div>\n",
                prediction.topic_label, prediction.category,
            ));
        }
        PageState::Error { message } => {
            page.push_str(&format!(
                "<div class=\"error\" role=\"alert\">\n<p>{}</p>\n</div>\n",
                clean_text(message)
            ));
        }
    }

    page.push_str(TAIL);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::TopicDistribution;

    fn prediction() -> TopicPrediction {
        TopicPrediction {
            topic_index: 0,
            topic_label: "Topic 1".to_string(),
            category: "Electronics",
            distribution: TopicDistribution::new(vec![0.9, 0.1]),
        }
    }

    #[test]
    fn empty_page_has_form_only() {
        let page = render_page(&PageState::Empty);
        assert!(page.contains("action=\"/analyze\""));
        assert!(page.contains("name=\"review\""));
        assert!(!page.contains("class=\"result\""));
        assert!(!page.contains("class=\"error\""));
    }

    #[test]
    fn result_page_shows_topic_and_category() {
        let prediction = prediction();
        let page = render_page(&PageState::Result {
            review: "great laptop",
            prediction: &prediction,
        });
        assert!(page.contains("<strong>Topic 1</strong>"));
        assert!(page.contains("<strong>Electronics</strong>"));
        assert!(page.contains(&format!("{}</textarea>", clean_text("great laptop"))));
    }

    #[test]
    fn review_markup_is_escaped() {
        let prediction = prediction();
        let page = render_page(&PageState::Result {
            review: "<script>alert(1)</script>",
            prediction: &prediction,
        });
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn error_page_shows_message() {
        let page = render_page(&PageState::Error {
            message: "missing required field `review`",
        });
        assert!(page.contains("class=\"error\""));
        assert!(page.contains("missing"));
    }
}
