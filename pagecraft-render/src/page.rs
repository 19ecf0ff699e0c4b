//! Full HTML page around a rendered tree.

use crate::markup::{escape_html, RenderNode};

/// Styles for the classes the renderer emits itself (layouts, slots,
/// placeholders, notices). Leaf look and feel belongs to the host theme.
pub const BASE_STYLESHEET: &str = r#"
*,*::before,*::after{box-sizing:border-box}
body{margin:0;font-family:system-ui,-apple-system,"Segoe UI",Roboto,sans-serif;color:#111827;line-height:1.5}
img{max-width:100%;height:auto}
.pc-page{max-width:1200px;margin:0 auto;padding:16px}
.pc-layout{align-items:stretch}
.pc-slot-empty{display:flex;align-items:center;justify-content:center;min-height:80px;border:1px dashed #d1d5db;border-radius:6px;color:#9ca3af;font-size:14px}
.pc-placeholder{padding:12px;border:1px dashed #f59e0b;border-radius:6px;background:#fffbeb;color:#92400e;font-size:14px}
.pc-empty-state{padding:12px;color:#6b7280;font-size:14px;text-align:center}
.pc-notice{margin:8px 0;padding:6px 10px;border-radius:4px;background:#eff6ff;color:#1e40af;font-size:12px}
.pc-button{display:inline-block;padding:8px 16px;border-radius:6px;border:1px solid transparent;text-decoration:none;cursor:pointer}
.pc-button--primary{background:#2563eb;color:#fff}
.pc-button--secondary{background:#e5e7eb;color:#111827}
.pc-button--outline{background:transparent;border-color:#2563eb;color:#2563eb}
.pc-button--link{background:transparent;color:#2563eb;text-decoration:underline}
.pc-alert{padding:12px 16px;border-radius:6px;border-left:4px solid}
.pc-alert--info{background:#eff6ff;border-color:#3b82f6}
.pc-alert--success{background:#f0fdf4;border-color:#22c55e}
.pc-alert--warning{background:#fffbeb;border-color:#f59e0b}
.pc-alert--error{background:#fef2f2;border-color:#ef4444}
.pc-table{width:100%;border-collapse:collapse}
.pc-table th,.pc-table td{padding:8px;border-bottom:1px solid #e5e7eb;text-align:left}
.pc-table--striped tbody tr:nth-child(odd){background:#f9fafb}
.pc-carousel-slide{display:none;height:100%}
.pc-carousel-slide.is-active{display:block}
.pc-countdown-units{display:flex;gap:12px}
@media (max-width:768px){.pc-slot{flex:0 0 100%!important;max-width:100%!important}}
"#;

/// Wraps a rendered body in a complete HTML document.
pub fn render_page_html(title: &str, body: &RenderNode) -> String {
    let mut out = String::with_capacity(BASE_STYLESHEET.len() + 512);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str("<style>");
    out.push_str(BASE_STYLESHEET);
    out.push_str("</style>\n</head>\n<body>\n<main class=\"pc-page\">");
    out.push_str(&body.to_html());
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Element;

    #[test]
    fn shell_escapes_title_and_embeds_body() {
        let body: RenderNode = Element::new("p").text("hi").into();
        let html = render_page_html("A & B", &body);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<main class=\"pc-page\"><p>hi</p></main>"));
        assert!(html.contains(".pc-slot-empty{"));
    }
}
