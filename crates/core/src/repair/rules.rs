//! Pattern rules
//!
//! Every rule is a single regex search-and-replace (two for `multiple_br`)
//! that leaves text without its trigger pattern untouched.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::{Diagnostic, RepairError, RuleName};

const UPLOAD_PATTERN: &str =
    r#"<a download="([^"]*)" class="imported-anchor-tag" href="([^"]*)" .*</a>"#;
const ATTACHMENT_PATTERN: &str = r#"<ATTACHMENT filename="([^"]*)".*</ATTACHMENT>"#;
const IMAGE_HTML_PATTERN: &str =
    r#"<p><img src="([^"]*)" alt="([^"]*)" class="img-responsive img-markdown" /><br\s?/>"#;
const MULTIPLE_BR_PATTERN: &str = r"<br\s?/>(?:\s?<br\s?/>)+";
const MULTIPLE_P_CLOSE_PATTERN: &str = r"(?:</p>){2,}";
const LINK_TEXT_PATTERN: &str = r#"<URL url=".*">.*LINK_TEXT text=&quot;<a href=".*".*href="([^"]*)".*</URL>(?:&quot; onclick=&quot;window\.open\(this\.href\);return false;)?"#;
const QUOTE_PATTERN: &str = r#"\[quote=(?:&quot;|")([^&"]*)(?:&quot;|")\]([^\[]*)\[/quote\]"#;

/// Compile `pattern` once per process.
fn compiled(
    cell: &'static OnceLock<Regex>,
    rule: RuleName,
    pattern: &str,
) -> Result<&'static Regex, RepairError> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }

    let re = Regex::new(pattern).map_err(|source| RepairError::Pattern { rule, source })?;
    Ok(cell.get_or_init(|| re))
}

/// Replace `<ATTACHMENT>` placeholders with Markdown images.
///
/// Upload markers (`<a download=... class="imported-anchor-tag" ...>`) carry
/// the URL of each attachment. They are collected into a name to URL table,
/// used to rewrite every placeholder, and then removed. A placeholder whose
/// file has no marker becomes `![name]()` and is reported as a diagnostic.
pub fn image_uploads(text: &str, diagnostics: &mut Vec<Diagnostic>) -> Result<String, RepairError> {
    static UPLOADS: OnceLock<Regex> = OnceLock::new();
    static ATTACHMENTS: OnceLock<Regex> = OnceLock::new();
    let uploads_re = compiled(&UPLOADS, RuleName::ImageUploads, UPLOAD_PATTERN)?;
    let attachments_re = compiled(&ATTACHMENTS, RuleName::ImageUploads, ATTACHMENT_PATTERN)?;

    let uploads: HashMap<&str, &str> = uploads_re
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect();

    // Two line breaks because the placeholder sits inside a <p>
    let replaced = attachments_re.replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        let url = match uploads.get(name) {
            Some(url) => *url,
            None => {
                diagnostics.push(Diagnostic::MissingAttachment {
                    filename: name.to_string(),
                });
                ""
            }
        };
        format!("\n\n![{name}]({url})")
    });

    Ok(uploads_re.replace_all(&replaced, "").into_owned())
}

/// Replace responsive `<img>` paragraphs with Markdown images.
pub fn image_html(text: &str, _: &mut Vec<Diagnostic>) -> Result<String, RepairError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = compiled(&RE, RuleName::ImageHtml, IMAGE_HTML_PATTERN)?;

    Ok(re.replace_all(text, "\n\n![${2}](${1})").into_owned())
}

/// Collapse runs of `<br/>` into one, and runs of `</p>` into one.
pub fn multiple_br(text: &str, _: &mut Vec<Diagnostic>) -> Result<String, RepairError> {
    static BR: OnceLock<Regex> = OnceLock::new();
    static P_CLOSE: OnceLock<Regex> = OnceLock::new();
    let br_re = compiled(&BR, RuleName::MultipleBr, MULTIPLE_BR_PATTERN)?;
    let p_close_re = compiled(&P_CLOSE, RuleName::MultipleBr, MULTIPLE_P_CLOSE_PATTERN)?;

    let text = br_re.replace_all(text, "<br/>");
    Ok(p_close_re.replace_all(&text, "</p>").into_owned())
}

/// Replace the imported `<URL>`/`LINK_TEXT` wrapper with a bare Markdown link.
pub fn link_text(text: &str, _: &mut Vec<Diagnostic>) -> Result<String, RepairError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = compiled(&RE, RuleName::LinkText, LINK_TEXT_PATTERN)?;

    Ok(re.replace_all(text, "\n[${1}](${1})\n").into_owned())
}

/// Turn `[quote="name"]...[/quote]` into an attributed Markdown blockquote.
///
/// The quoted content ends at the first `[`, so quotes holding brackets are
/// left alone.
pub fn quote(text: &str, _: &mut Vec<Diagnostic>) -> Result<String, RepairError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = compiled(&RE, RuleName::Quote, QUOTE_PATTERN)?;

    Ok(re
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let content = caps[2].replace("<br/>\n", "\n> ");
            format!("\n@{name} a dit :\n\n> {content}\n\n")
        })
        .into_owned())
}
