use std::process::Command;

/// Platform-dependent key hints, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLabels {
    pub delete: &'static str,
}

impl KeyLabels {
    pub fn for_os(os: &str) -> Self {
        let delete = match os {
            "macos" => "Option+Backspace: delete",
            "linux" | "windows" => "Win+Backspace: delete",
            _ => "Alt+Backspace: delete",
        };
        Self { delete }
    }

    pub fn current() -> Self {
        Self::for_os(std::env::consts::OS)
    }
}

/// Open a URL with the system's default handler. Failures are logged only.
pub fn open_url(url: &str) {
    if url.is_empty() {
        tracing::debug!("no url to open");
        return;
    }

    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };

    match command.output() {
        Ok(output) if output.status.success() => {
            tracing::debug!(url, "opened url");
        }
        Ok(output) => {
            tracing::warn!(
                url,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "browser command failed"
            );
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "failed to launch browser");
        }
    }
}
