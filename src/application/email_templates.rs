const BRAND_NAME: &str = "verimail";

pub fn primary_button(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{url}" style="display:block;width:100%;padding:12px;background-color:#0070f3;color:#ffffff;text-decoration:none;text-align:center;border-radius:3px;font-size:16px;">{label}</a>"#
    )
}

/// Minimal escaping for user-supplied text placed into email HTML.
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

/// Subject and HTML body of the "verify your email" message.
pub fn verification_email(user_name: &str, verification_link: &str, ttl_hours: i64) -> (String, String) {
    let subject = "Verify your email".to_string();
    let name = escape_html(user_name);
    let link = escape_html(verification_link);
    let button = primary_button(&link, "Verify Email Address");

    let body = format!(
        r#"<p style="color:#333;font-size:16px;line-height:26px;">Hello {name},</p>
<p style="color:#333;font-size:16px;line-height:26px;">Thank you for signing up. We just need to verify your email address to complete your registration.</p>
<div style="padding:27px 0;">{button}</div>
<p style="color:#333;font-size:16px;line-height:26px;">This link will expire in {ttl_hours} hours. If you didn't request this verification, you can safely ignore this email.</p>
<hr style="border-color:#cccccc;margin:20px 0;">
<p style="color:#8898aa;font-size:12px;line-height:16px;">If you're having trouble clicking the button, copy and paste the URL below into your web browser:</p>
<a href="{link}" style="color:#0070f3;font-size:14px;text-decoration:underline;word-break:break-all;">{link}</a>"#
    );

    (subject, wrap_email("Verify your email", &body))
}

pub fn wrap_email(headline: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{headline}</title></head>
<body style="background-color:#ffffff;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Oxygen-Sans,Ubuntu,Cantarell,'Helvetica Neue',sans-serif;">
<div style="margin:0 auto;padding:20px 0 48px;width:560px;">
<h1 style="color:#333;font-size:24px;font-weight:bold;padding-bottom:10px;">{headline}</h1>
{body}
<p style="margin-top:32px;color:#9ca3af;font-size:12px;">Sent by {BRAND_NAME}</p>
</div>
</body>
</html>"#
    )
}
