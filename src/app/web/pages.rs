use crate::app::models::{DeviceRecord, StatusMessage};

const HTML_PREFIX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
"#;

const STYLE: &str = r#"<style>
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 56rem; padding: 0 1rem; color: #1f2328; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border-bottom: 1px solid #d0d7de; padding: 0.4rem 0.6rem; text-align: left; }
.banner { padding: 0.75rem 1rem; border-radius: 6px; white-space: pre-line; }
.banner.ok { background: #dafbe1; }
.banner.error { background: #ffebe9; }
.selected { font-weight: 600; }
label { display: block; margin: 0.5rem 0; }
</style>
"#;

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn layout(title: &str, status: &StatusMessage, body: &str) -> String {
    let mut output = String::with_capacity(body.len() + 1024);
    output.push_str(HTML_PREFIX);
    output.push_str(&format!("<title>{} - Bloatware Remover</title>\n", escape_html(title)));
    output.push_str(STYLE);
    output.push_str("</head>\n<body>\n");
    output.push_str(
        "<nav><a href=\"/\">Devices</a><a href=\"/connect\">Pair device</a><a href=\"/packages\">Packages</a></nav>\n",
    );
    output.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    output.push_str(&render_banner(status));
    output.push_str(body);
    output.push_str("</body>\n</html>\n");
    output
}

fn render_banner(status: &StatusMessage) -> String {
    if status.message.is_empty() {
        return String::new();
    }
    let class = if status.success { "ok" } else { "error" };
    format!(
        "<p class=\"banner {class}\" role=\"status\">{}</p>\n",
        escape_html(&status.message)
    )
}

pub fn render_devices(devices: &[DeviceRecord], status: &StatusMessage) -> String {
    let mut body = String::new();
    if devices.is_empty() {
        body.push_str("<p><a href=\"/\">Refresh</a> or <a href=\"/connect\">pair a device</a>.</p>\n");
        return layout("Devices", status, &body);
    }

    body.push_str("<form method=\"post\" action=\"/select-device\">\n<table>\n");
    body.push_str("<tr><th></th><th>Serial number</th><th>State</th><th>Model</th></tr>\n");
    for device in devices {
        let serial = escape_html(&device.serial_number);
        let checked = if device.is_selected { " checked" } else { "" };
        let row_class = if device.is_selected { " class=\"selected\"" } else { "" };
        body.push_str(&format!(
            "<tr{row_class}><td><input type=\"radio\" name=\"selected_device\" value=\"{serial}\"{checked} required></td>\
             <td>{serial}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&device.state),
            escape_html(&device.model),
        ));
    }
    body.push_str("</table>\n<button type=\"submit\">Use selected device</button>\n</form>\n");
    layout("Devices", status, &body)
}

/// `paired` is `None` before the first attempt.
pub fn render_connect(paired: Option<bool>) -> String {
    let status = match paired {
        Some(false) => StatusMessage::failure(
            "Failed to pair with the device. Check the IP address, port and pairing code.",
        ),
        _ => StatusMessage::none(),
    };
    let body = "<p>On the device open <em>Developer options &rsaquo; Wireless debugging &rsaquo; \
                Pair device with pairing code</em> and enter the values it shows.</p>\n\
                <form method=\"post\" action=\"/connect-to-device\">\n\
                <label>IP address <input name=\"device_ip\" required></label>\n\
                <label>Port <input name=\"device_port\" inputmode=\"numeric\" required></label>\n\
                <label>Pairing code <input name=\"pair_code\" inputmode=\"numeric\" autocomplete=\"off\" required></label>\n\
                <button type=\"submit\">Pair</button>\n\
                </form>\n";
    layout("Pair device", &status, body)
}

pub fn render_packages(packages: &[String], status: &StatusMessage) -> String {
    let mut body = String::new();
    if packages.is_empty() {
        return layout("Packages", status, &body);
    }

    body.push_str(&format!("<p>{} packages installed.</p>\n", packages.len()));
    body.push_str("<form method=\"post\" action=\"/apply-actions\">\n<table>\n");
    body.push_str("<tr><th>Package</th><th>Action</th></tr>\n");
    for package in packages {
        let package = escape_html(package);
        body.push_str(&format!(
            "<tr><td>{package}</td><td><select name=\"action_{package}\">\
             <option value=\"\" selected>No action</option>\
             <option value=\"disable\">Disable</option>\
             <option value=\"uninstall\">Uninstall</option>\
             </select></td></tr>\n"
        ));
    }
    body.push_str("</table>\n<button type=\"submit\">Apply actions</button>\n</form>\n");
    layout("Packages", status, &body)
}

pub fn render_status(status: &StatusMessage) -> String {
    layout(
        "Result",
        status,
        "<p><a href=\"/packages\">Back to packages</a></p>\n",
    )
}
