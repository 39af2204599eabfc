//! Output envelopes. Each carries the rendered markup unchanged; only the
//! surrounding document differs per format.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::render::{RenderedDocument, escape_html};

/// Generator name declared in word-processor output.
pub const WORD_GENERATOR: &str = "Microsoft Word 15";

/// Longest encoded line in the archival body.
const MIME_LINE: usize = 76;

/// Bytes per encoded word: 45 bytes become 60 base64 characters, keeping
/// each `=?utf-8?B?...?=` word within 75.
const ENCODED_WORD_BYTES: usize = 45;

const PRINT_CSS: &str =
    "* { -webkit-print-color-adjust: exact; print-color-adjust: exact; }\n@media print { body { margin: 0; } }\n";

/// Standalone HTML page.
#[must_use]
pub fn html_document(rendered: &RenderedDocument) -> String {
    rendered.to_html()
}

/// Single-file web archive: a `multipart/related` MIME envelope with one
/// base64-encoded HTML part.
#[must_use]
pub fn archival_document(rendered: &RenderedDocument) -> String {
    let boundary = format!("----=_NextPart_{}", Uuid::new_v4().simple());
    archival_with_boundary(rendered, &boundary)
}

pub(crate) fn archival_with_boundary(rendered: &RenderedDocument, boundary: &str) -> String {
    format!(
        "MIME-Version: 1.0\r\n\
         Subject: {subject}\r\n\
         Content-Type: multipart/related; boundary=\"{boundary}\"; type=\"text/html\"\r\n\
         \r\n\
         This is a multi-part message in MIME format.\r\n\
         \r\n\
         --{boundary}\r\n\
         Content-Type: text/html; charset=\"utf-8\"\r\n\
         Content-Transfer-Encoding: base64\r\n\
         Content-Location: file:///{stem}.htm\r\n\
         \r\n\
         {body}\r\n\
         --{boundary}--\r\n",
        subject = subject_header(&rendered.title),
        stem = rendered.file_stem(),
        body = wrapped_base64(rendered.to_html().as_bytes()),
    )
}

/// Base64 in lines of at most [`MIME_LINE`] characters.
fn wrapped_base64(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    encoded
        .as_bytes()
        .chunks(MIME_LINE)
        .filter_map(|line| std::str::from_utf8(line).ok())
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Header-safe subject. Control characters become spaces; non-ASCII or
/// overlong titles are sent as folded RFC 2047 encoded words.
fn subject_header(title: &str) -> String {
    let clean: String = title
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if clean.is_ascii() && clean.len() <= MIME_LINE - "Subject: ".len() {
        return clean;
    }

    let mut words = Vec::new();
    let mut chunk = String::new();
    for c in clean.chars() {
        if chunk.len() + c.len_utf8() > ENCODED_WORD_BYTES {
            words.push(encoded_word(&chunk));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        words.push(encoded_word(&chunk));
    }
    words.join("\r\n ")
}

fn encoded_word(text: &str) -> String {
    format!("=?utf-8?B?{}?=", STANDARD.encode(text))
}

/// Word-processor compatible markup, declaring Word as its generator so
/// the file opens in print layout.
#[must_use]
pub fn word_document(rendered: &RenderedDocument) -> String {
    format!(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" xmlns:w=\"urn:schemas-microsoft-com:office:word\" xmlns=\"http://www.w3.org/TR/REC-html40\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"ProgId\" content=\"Word.Document\">\n\
         <meta name=\"Generator\" content=\"{WORD_GENERATOR}\">\n\
         <meta name=\"Originator\" content=\"{WORD_GENERATOR}\">\n\
         <title>{title}</title>\n\
         <!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View><w:Zoom>100</w:Zoom><w:DoNotOptimizeForBrowser/></w:WordDocument></xml><![endif]-->\n\
         <style>\n{css}</style>\n\
         </head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n",
        title = escape_html(&rendered.title),
        css = rendered.stylesheet,
        body = rendered.markup,
    )
}

/// Print job: the page plus colour-exact print rules and an instruction to
/// open the print dialog once loaded.
#[must_use]
pub fn print_document(rendered: &RenderedDocument) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{css}{PRINT_CSS}</style>\n</head>\n<body onload=\"window.print()\">\n{body}\n</body>\n</html>\n",
        title = escape_html(&rendered.title),
        css = rendered.stylesheet,
        body = rendered.markup,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use crate::customization::RenderFormat;
    use crate::document::DocumentType;

    fn rendered() -> RenderedDocument {
        RenderedDocument {
            document_type: DocumentType::Invoice,
            title: "INVOICE INV-2024-0001".to_string(),
            markup: "<div class=\"document invoice\"><h1>INVOICE</h1>\n<p>Body</p></div>"
                .to_string(),
            stylesheet: "body { color: #222; }\n".to_string(),
            format: RenderFormat::Screen,
        }
    }

    /// Decodes the single HTML part of an archival envelope.
    fn archived_html(envelope: &str, boundary: &str) -> String {
        let part = envelope
            .split(&format!("--{boundary}\r\n"))
            .nth(1)
            .unwrap();
        let (_, body) = part.split_once("\r\n\r\n").unwrap();
        let body = body.split(&format!("\r\n--{boundary}--")).next().unwrap();
        let encoded: String = body.split("\r\n").collect();
        String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap()
    }

    fn titled(title: &str, markup: String) -> RenderedDocument {
        RenderedDocument {
            title: title.to_string(),
            markup,
            ..rendered()
        }
    }

    #[test]
    fn test_archival_is_multipart_with_one_html_part() {
        let doc = archival_with_boundary(&rendered(), "BOUNDARY");

        assert!(doc.starts_with("MIME-Version: 1.0\r\n"));
        assert!(doc.contains("Content-Type: multipart/related; boundary=\"BOUNDARY\""));
        assert_eq!(doc.matches("--BOUNDARY\r\n").count(), 1);
        assert!(doc.ends_with("--BOUNDARY--\r\n"));
        assert_eq!(doc.matches("Content-Type: text/html").count(), 1);
        assert!(doc.contains("Content-Transfer-Encoding: base64\r\n"));
        assert!(doc.contains("Content-Location: file:///INV-2024-0001.htm"));
        assert!(doc.contains("Subject: INVOICE INV-2024-0001\r\n"));

        let html = archived_html(&doc, "BOUNDARY");
        assert_eq!(html, rendered().to_html());
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_archival_lines_stay_short() {
        let long_line = format!("<div>{}</div>", "<p>Row</p>".repeat(500));
        let doc = archival_with_boundary(&titled("INVOICE INV-9", long_line.clone()), "B");

        assert!(doc.split("\r\n").all(|line| line.len() <= 998));
        let body_lines: Vec<_> = doc
            .split("\r\n")
            .skip_while(|line| !line.starts_with("Content-Location"))
            .skip(2)
            .take_while(|line| !line.starts_with("--B--"))
            .collect();
        assert!(body_lines.len() > 1);
        assert!(body_lines.iter().all(|line| line.len() <= MIME_LINE));
        assert!(archived_html(&doc, "B").contains(&long_line));
    }

    #[test]
    fn test_subject_cannot_inject_headers() {
        let doc = archival_with_boundary(
            &titled("INVOICE INV-1\r\nX-Injected: yes", "<p>Body</p>".to_string()),
            "B",
        );

        assert!(!doc.split("\r\n").any(|line| line.starts_with("X-Injected")));
        assert!(doc.contains("Subject: INVOICE INV-1  X-Injected: yes\r\n"));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let title = "INVOICE Café Ñandú";
        let doc = archival_with_boundary(&titled(title, "<p>Body</p>".to_string()), "B");

        let subject = doc
            .split("\r\n")
            .find_map(|line| line.strip_prefix("Subject: "))
            .unwrap();
        assert!(subject.is_ascii());
        let payload = subject
            .strip_prefix("=?utf-8?B?")
            .and_then(|rest| rest.strip_suffix("?="))
            .unwrap();
        assert_eq!(String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap(), title);
    }

    #[test]
    fn test_long_subject_is_folded() {
        let title = format!("INVOICE {}", "9".repeat(120));
        let subject = subject_header(&title);

        assert!(subject.split("\r\n").all(|line| line.len() <= 76));
        let decoded: String = subject
            .split("\r\n ")
            .map(|word| {
                let payload = word
                    .strip_prefix("=?utf-8?B?")
                    .and_then(|rest| rest.strip_suffix("?="))
                    .unwrap();
                String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap()
            })
            .collect();
        assert_eq!(decoded, title);
    }

    #[test]
    fn test_archival_boundaries_are_unique() {
        let a = archival_document(&rendered());
        let b = archival_document(&rendered());
        assert_ne!(a, b);
    }

    #[test]
    fn test_word_declares_generator() {
        let doc = word_document(&rendered());
        assert!(doc.contains("<meta name=\"Generator\" content=\"Microsoft Word 15\">"));
        assert!(doc.contains(&rendered().markup));
    }

    #[test]
    fn test_print_forces_exact_colors_and_prints() {
        let doc = print_document(&rendered());
        assert!(doc.contains("print-color-adjust: exact"));
        assert!(doc.contains("window.print()"));
        assert!(doc.contains(&rendered().markup));
    }
}
