//! HTML pages for the recap web interface

use axum::response::Html;

/// GET / - render the upload form without results
pub async fn index() -> Html<String> {
    render_page(None, None)
}

/// Render the upload form, with transcript and summary when available.
pub fn render_page(transcript: Option<&str>, summary: Option<&str>) -> Html<String> {
    let results = match (transcript, summary) {
        (Some(transcript), Some(summary)) => format!(
            r#"
    <section class="results">
        <h2>Transcript</h2>
        <pre>{}</pre>
        <h2>Summary</h2>
        <pre>{}</pre>
    </section>"#,
            escape_html(transcript),
            escape_html(summary)
        ),
        _ => String::new(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>recap - Audio Transcription</title>
    <style>
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }}
        h1 {{
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }}
        form {{
            margin: 20px 0;
            padding: 20px;
            border: 1px solid #ddd;
            border-radius: 4px;
        }}
        .button {{
            display: inline-block;
            padding: 10px 20px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }}
        .button:hover {{
            background: #0052a3;
        }}
        pre {{
            background: #f5f5f5;
            padding: 15px;
            border-radius: 4px;
            white-space: pre-wrap;
            word-wrap: break-word;
        }}
    </style>
</head>
<body>
    <h1>recap</h1>
    <p>Upload an audio recording to get a transcript and a short summary.
       The file is processed once and then deleted.</p>

    <form action="/" method="post" enctype="multipart/form-data">
        <input type="file" name="audio_file" accept="audio/*">
        <button type="submit" class="button">Transcribe</button>
    </form>
{results}
    <p><small>recap v{version}</small></p>
</body>
</html>
"#,
        results = results,
        version = crate::VERSION,
    ))
}

/// Minimal HTML escaping for user-controlled text.
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"a" & b</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; b&lt;/b&gt;"
        );
    }

    #[test]
    fn empty_page_has_form_but_no_results() {
        let Html(page) = render_page(None, None);
        assert!(page.contains(r#"name="audio_file""#));
        assert!(!page.contains("<h2>Transcript</h2>"));
    }

    #[test]
    fn results_page_escapes_transcript() {
        let Html(page) = render_page(Some("<script>alert(1)</script>"), Some("summary"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("<h2>Summary</h2>"));
    }
}
