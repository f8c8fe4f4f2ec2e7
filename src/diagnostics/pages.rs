use std::fmt::Write as _;
use std::process::Command;

use crate::config::Settings;
use crate::utils::{format_bytes, sanitize_str};

/// External commands probed for availability on the dashboard
const PROBED_COMMANDS: [&str; 3] = ["git", "curl", "tar"];

/// Render the environment dashboard served at `/`
pub fn render_dashboard(settings: &Settings) -> String {
    let mut body = String::new();

    body.push_str("<div class=\"card\"><h3>Application</h3><table>");
    push_row(&mut body, "Name", &settings.app.name);
    push_row(&mut body, "Version", &settings.app.version);
    push_row(&mut body, "Environment", &settings.app.environment);
    push_row(
        &mut body,
        "Debug",
        if settings.app.debug { "enabled" } else { "disabled" },
    );
    push_row(&mut body, "Timezone", &settings.timezone);
    push_row(
        &mut body,
        "Generated",
        &chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string(),
    );
    body.push_str("</table></div>");

    body.push_str("<div class=\"card\"><h3>Server</h3><table>");
    push_row(&mut body, "Operating System", std::env::consts::OS);
    push_row(&mut body, "Architecture", std::env::consts::ARCH);
    push_row(&mut body, "Hostname", &hostname());
    push_row(&mut body, "Process ID", &std::process::id().to_string());
    push_row(&mut body, "Load Average", &load_average());
    push_row(&mut body, "Disk Free", &disk_free());
    body.push_str("</table></div>");

    body.push_str("<div class=\"card\"><h3>External Commands</h3><table>");
    for cmd in PROBED_COMMANDS {
        let available = command_available(cmd);
        let _ = write!(
            body,
            "<tr><th>{cmd}</th><td class=\"{}\">{}</td></tr>",
            if available { "ok" } else { "warn" },
            if available { "available" } else { "not found" },
        );
    }
    body.push_str("</table></div>");

    body.push_str("<div class=\"card\"><h3>Rate Limiting</h3><table>");
    push_row(
        &mut body,
        "Enabled",
        if settings.api.rate_limit.enabled { "yes" } else { "no" },
    );
    push_row(
        &mut body,
        "Requests / minute",
        &settings.api.rate_limit.requests_per_minute.to_string(),
    );
    body.push_str("</table></div>");

    page_layout(
        &format!("{} - Environment Info", settings.app.name),
        "Hosting Environment Information",
        &body,
    )
}

/// Render the runtime information page served at `/info`
///
/// Environment variable values whose names look secret are redacted.
pub fn render_runtime_info(settings: &Settings) -> String {
    let mut body = String::new();

    body.push_str("<div class=\"card\"><h3>Build</h3><table>");
    push_row(&mut body, "Package", env!("CARGO_PKG_NAME"));
    push_row(&mut body, "Package Version", env!("CARGO_PKG_VERSION"));
    push_row(&mut body, "Target OS", std::env::consts::OS);
    push_row(&mut body, "Target Architecture", std::env::consts::ARCH);
    body.push_str("</table></div>");

    body.push_str("<div class=\"card\"><h3>Settings</h3><table>");
    push_row(&mut body, "Log File", &settings.logging.file);
    push_row(&mut body, "Log Level", &settings.logging.level);
    push_row(&mut body, "Cache Path", &settings.cache.path);
    push_row(&mut body, "Upload Path", &settings.upload.upload_path);
    push_row(
        &mut body,
        "Upload Max Size",
        &format_bytes(settings.upload.max_size, 2),
    );
    push_row(
        &mut body,
        "Allowed Upload Types",
        &settings.upload.allowed_types.join(", "),
    );
    push_row(
        &mut body,
        "Session Lifetime",
        &format!("{} s", settings.security.session_lifetime),
    );
    push_row(
        &mut body,
        "CSRF Protection",
        if settings.security.csrf_protection { "enabled" } else { "disabled" },
    );
    push_row(
        &mut body,
        "Allowed Origins",
        &settings.security.allowed_origins.join(", "),
    );
    body.push_str("</table></div>");

    body.push_str("<div class=\"card\"><h3>Environment Variables</h3><table>");
    let mut vars: Vec<(String, String)> = std::env::vars().collect();
    vars.sort();
    for (name, value) in vars {
        let shown = if is_sensitive(&name) { "[redacted]".to_string() } else { value };
        push_row(&mut body, &name, &shown);
    }
    body.push_str("</table></div>");

    page_layout(
        &format!("{} - Runtime Info", settings.app.name),
        "Runtime Information",
        &body,
    )
}

/// Shared HTML shell for all diagnostic pages
pub fn page_layout(title: &str, heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 0; padding: 20px; background: #f0f2f5; color: #333; }}\n\
         .container {{ max-width: 1000px; margin: 0 auto; background: white; border-radius: 8px; \
         box-shadow: 0 2px 8px rgba(0,0,0,0.15); overflow: hidden; }}\n\
         .header {{ background: #2c3e50; color: white; padding: 24px; text-align: center; }}\n\
         .content {{ padding: 24px; }}\n\
         .card {{ background: #f8f9fa; border-left: 4px solid #3498db; border-radius: 6px; \
         padding: 16px; margin-bottom: 16px; }}\n\
         table {{ width: 100%; border-collapse: collapse; }}\n\
         th, td {{ text-align: left; padding: 6px 8px; border-bottom: 1px solid #ddd; }}\n\
         .ok {{ color: #27ae60; }}\n\
         .warn {{ color: #f39c12; }}\n\
         .fail {{ color: #e74c3c; }}\n\
         </style>\n</head>\n<body>\n<div class=\"container\">\n\
         <div class=\"header\"><h1>{heading}</h1></div>\n\
         <div class=\"content\">\n{body}\n</div>\n</div>\n</body>\n</html>\n",
        title = sanitize_str(title),
        heading = sanitize_str(heading),
    )
}

pub(crate) fn push_row(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        "<tr><th>{}</th><td>{}</td></tr>",
        sanitize_str(label),
        sanitize_str(value)
    );
}

fn hostname() -> String {
    shell_probe("hostname").unwrap_or_else(|| "unknown".to_string())
}

fn load_average() -> String {
    match std::fs::read_to_string("/proc/loadavg") {
        Ok(content) => {
            let fields: Vec<&str> = content.split_whitespace().take(3).collect();
            if fields.len() == 3 {
                format!("{} {} {}", fields[0], fields[1], fields[2])
            } else {
                "unavailable".to_string()
            }
        }
        Err(_) => "unavailable".to_string(),
    }
}

/// Free space on the filesystem backing the working directory, via `df`
fn disk_free() -> String {
    let output = shell_probe("df -Pk . | tail -1 | awk '{print $4}'");
    match output.and_then(|s| s.trim().parse::<u64>().ok()) {
        Some(kib) => format_bytes(kib * 1024, 2),
        None => "unavailable".to_string(),
    }
}

fn command_available(cmd: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {cmd}"))
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn shell_probe(script: &str) -> Option<String> {
    let output = Command::new("sh").arg("-c").arg(script).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn is_sensitive(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    ["SECRET", "PASSWORD", "TOKEN", "KEY", "CREDENTIAL"]
        .iter()
        .any(|marker| upper.contains(marker))
}
