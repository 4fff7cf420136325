//! Success page shown in the browser after the callback.

use crate::error::{RelayError, Result};
use crate::state::StateKey;

const PLAIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Signed in</title></head>
<body>
<h1>Authentication successful</h1>
<p>You can close this window and return to the app.</p>
</body>
</html>
"#;

/// Render the success page.
///
/// With an app URI scheme, the page sends the browser straight back into the
/// app at `{scheme}://auth?state=...`, with a link as fallback.
///
/// # Errors
///
/// Returns [`RelayError::InternalError`] if the state cannot be encoded.
pub fn render_success_page(app_uri_scheme: Option<&str>, state: &StateKey) -> Result<String> {
    let Some(scheme) = app_uri_scheme else {
        return Ok(PLAIN_PAGE.to_string());
    };

    let query = serde_urlencoded::to_string([("state", state.as_str())])
        .map_err(|e| RelayError::InternalError(format!("Failed to encode state: {e}")))?;
    let target = escape_html(&format!("{scheme}://auth?{query}"));

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Signed in</title>
<meta http-equiv="refresh" content="0;url={target}">
</head>
<body>
<h1>Authentication successful</h1>
<p>Returning to the app. If nothing happens, <a href="{target}">open the app</a>.</p>
</body>
</html>
"#
    ))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_page_without_scheme() {
        let page = render_success_page(None, &StateKey::new("xyz")).unwrap();
        assert!(page.contains("return to the app"));
        assert!(!page.contains("http-equiv"));
    }

    #[test]
    fn test_redirect_page_carries_state() {
        let page = render_success_page(Some("mygame"), &StateKey::new("xyz")).unwrap();
        assert!(page.contains(r#"content="0;url=mygame://auth?state=xyz""#));
        assert!(page.contains(r#"href="mygame://auth?state=xyz""#));
    }

    #[test]
    fn test_hostile_state_is_encoded() {
        let page =
            render_success_page(Some("mygame"), &StateKey::new(r#""><script>x</script>"#)).unwrap();
        assert!(!page.contains("<script>"));
        assert!(page.contains("state=%22%3E%3Cscript%3Ex%3C%2Fscript%3E"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a&b<c>"d'"#), "a&amp;b&lt;c&gt;&quot;d&#x27;");
    }
}
