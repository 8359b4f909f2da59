//! Server-rendered HTML for the transcriptor page.

use std::fmt::Write;

use crate::models::Language;
use crate::ocr::{OcrProvider, SUPPORTED_EXTENSIONS};
use crate::session::{Notice, Session};

pub const BUSY_INDICATOR_ID: &str = "busy";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn accept_attribute() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn render_language_select(out: &mut String, selected: Language) {
    out.push_str(
        r#"<section>
<h2>1. Choose the language of the text</h2>
<form method="post" action="/language" data-autosubmit>
<label for="language">Pick the language used in the image to improve accuracy:</label>
<select id="language" name="language">
"#,
    );
    for language in Language::ALL {
        let _ = writeln!(
            out,
            r#"<option value="{}"{}>{}</option>"#,
            language.code(),
            if language == selected { " selected" } else { "" },
            language.display_name()
        );
    }
    out.push_str(
        r#"</select>
<noscript><button type="submit">Apply</button></noscript>
</form>
</section>
"#,
    );
}

fn render_upload(out: &mut String, session: &Session) {
    let _ = write!(
        out,
        r#"<section>
<h2>2. Upload your image</h2>
<form method="post" action="/upload" enctype="multipart/form-data" data-busy="{busy}">
<label for="file">Drag and drop an image here, or click to select one.</label>
<input type="file" id="file" name="file" accept="{accept}" required>
<input type="hidden" name="language" value="{code}">
<button type="submit">Upload</button>
</form>
"#,
        busy = BUSY_INDICATOR_ID,
        accept = accept_attribute(),
        code = session.language.code(),
    );

    if let Some(upload) = &session.upload {
        let (width, height) = (upload.width, upload.height);
        let _ = write!(
            out,
            r#"<figure>
<img src="/preview" alt="{name}" width="{width}" height="{height}">
<figcaption>Uploaded image: {name}</figcaption>
</figure>
<form method="post" action="/extract" data-busy="{busy}">
<input type="hidden" name="language" value="{code}">
<button type="submit">✨ Extract text in {language}</button>
</form>
"#,
            name = escape_html(&upload.filename),
            busy = BUSY_INDICATOR_ID,
            code = session.language.code(),
            language = session.language.display_name(),
        );
    }

    let _ = write!(
        out,
        r#"<div class="busy" id="{BUSY_INDICATOR_ID}" role="status" hidden><span class="spinner"></span>Processing the image, please wait...</div>
</section>
"#
    );
}

fn render_notice(out: &mut String, notice: &Notice) {
    let (class, message, detail) = match notice {
        Notice::Error { message, detail } => ("notice-error", message, detail.as_ref()),
        Notice::Warning(message) => ("notice-warning", message, None),
    };

    let _ = write!(
        out,
        r#"<div class="notice {class}" role="alert"><strong>{}</strong>"#,
        escape_html(message)
    );
    if let Some(detail) = detail {
        let _ = write!(out, "<p>{}</p>", escape_html(detail));
    }
    out.push_str("</div>\n");
}

fn render_review(out: &mut String, session: &Session) {
    let Some(extracted) = &session.extracted else {
        return;
    };

    // The newline after <textarea> is swallowed by the HTML parser, so text
    // that itself starts with a newline survives intact.
    let _ = write!(
        out,
        r#"<section>
<h2>3. Review and download the text</h2>
<form method="post" action="/download">
<label for="text">Extracted text (you can edit it here before downloading):</label>
<textarea id="text" name="text" rows="15" spellcheck="false">
{text}</textarea>
<button type="submit">📥 Download text (.txt)</button>
<p class="hint">Saved as <code>{filename}</code> ({language})</p>
</form>
</section>
"#,
        text = escape_html(&extracted.text),
        filename = escape_html(&extracted.download_filename()),
        language = extracted.language.display_name(),
    );
}

/// Render the whole page for `session`, showing `notice` once.
pub fn render_page(session: &Session, notice: Option<&Notice>, ocr: &OcrProvider) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Image Transcriptor (OCR)</title>
<link rel="stylesheet" href="/assets/style.css">
<script src="/assets/app.js" defer></script>
</head>
<body>
<main>
<h1>📷 Image to Text Transcriptor (OCR)</h1>
<p>Upload an image to extract its text. You can <strong>review, edit and download</strong> the result.</p>
"#,
    );

    if let Some(reason) = ocr.unavailable_reason() {
        render_notice(
            &mut out,
            &Notice::error(
                "The OCR engine is not available on this server.",
                Some(format!("{} {reason}", crate::ocr::ENGINE_REMEDIATION)),
            ),
        );
    }

    render_language_select(&mut out, session.language);
    render_upload(&mut out, session);

    if let Some(notice) = notice {
        render_notice(&mut out, notice);
    }

    render_review(&mut out, session);

    if session.upload.is_some() || session.extracted.is_some() {
        out.push_str(
            r#"<form method="post" action="/reset">
<button type="submit" class="secondary">Start over</button>
</form>
"#,
        );
    }

    out.push_str(
        r#"<footer>Made with ❤️ using <strong>Rust</strong> and <strong>Tesseract</strong>.</footer>
</main>
</body>
</html>
"#,
    );

    out
}
