//! # Notification Module
//!
//! User-facing reporting for a program that usually runs without a
//! console. Outcomes are surfaced through native message boxes, with both
//! the success and the error channel individually suppressible from the
//! command line.
//!
//! The box-showing side lives behind the [`Notifier`] trait so outcome
//! reporting can be tested without popping real windows.

use std::path::Path;

use log::{error, info};

use crate::installer::{InstallError, InstallOutcome};

/// Caption used for every error box.
pub const ERROR_CAPTION: &str = "Fatal Error";

/// Caption used for every success box.
pub const SUCCESS_CAPTION: &str = "Success";

/// Which outcome channels may reach the user. Built once from the command
/// line and passed down; nothing else consults the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reporting {
    /// Show a box when the run succeeds.
    pub success: bool,
    /// Show a box when the run fails.
    pub errors: bool,
}

impl Default for Reporting {
    fn default() -> Self {
        Reporting {
            success: true,
            errors: true,
        }
    }
}

/// Abstraction for showing message boxes. Allows outcome reporting to be
/// exercised in tests without any UI.
pub trait Notifier {
    /// Show an informational box.
    fn show_info(&self, caption: &str, message: &str);

    /// Show an error box.
    fn show_error(&self, caption: &str, message: &str);
}

/// The real implementation, backed by native message boxes. On platforms
/// without them the boxes degrade to console output.
pub struct MessageBoxNotifier;

impl Notifier for MessageBoxNotifier {
    fn show_info(&self, caption: &str, message: &str) {
        show_box(caption, message, false);
    }

    fn show_error(&self, caption: &str, message: &str) {
        show_box(caption, message, true);
    }
}

#[cfg(windows)]
fn show_box(caption: &str, message: &str, is_error: bool) {
    use windows::core::HSTRING;
    use windows::Win32::UI::WindowsAndMessaging::{
        MessageBoxW, MB_ICONERROR, MB_ICONINFORMATION,
    };

    let style = if is_error {
        MB_ICONERROR
    } else {
        MB_ICONINFORMATION
    };

    // Owner-less modal box; the status window stays up behind it. The
    // pressed button does not matter.
    unsafe {
        let _ = MessageBoxW(
            None,
            &HSTRING::from(message),
            &HSTRING::from(caption),
            style,
        );
    }
}

#[cfg(not(windows))]
fn show_box(caption: &str, message: &str, is_error: bool) {
    if is_error {
        eprintln!("{}: {}", caption, message);
    } else {
        println!("{}: {}", caption, message);
    }
}

/// Body text of an error box: the message, the exit code about to be
/// returned, and the directory the run started from.
pub fn error_body(message: &str, code: i32, current_path: &Path) -> String {
    format!(
        "{}\r\n\r\nError code: {}\r\nCurrent path: {}",
        message,
        code,
        current_path.display()
    )
}

/// Reports an installation result to the user and returns the process
/// exit code for it.
///
/// The outcome is always logged. Success and failure each go through
/// their own [`Reporting`] channel; a suppressed channel changes nothing
/// about the returned code.
pub fn report_outcome(
    result: &Result<InstallOutcome, InstallError>,
    start_dir: &Path,
    reporting: Reporting,
    notifier: &impl Notifier,
) -> i32 {
    match result {
        Ok(outcome) => {
            info!("{}", outcome.message());
            if reporting.success {
                notifier.show_info(SUCCESS_CAPTION, outcome.message());
            }
            0
        }
        Err(failure) => {
            let code = failure.exit_code();
            error!("{} (exit code {})", failure, code);
            if reporting.errors {
                let body = error_body(&failure.to_string(), code, start_dir);
                notifier.show_error(ERROR_CAPTION, &body);
            }
            code
        }
    }
}

/// A recording notifier for tests.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MockNotifier {
    pub infos: std::sync::Mutex<Vec<(String, String)>>,
    pub errors: std::sync::Mutex<Vec<(String, String)>>,
}

impl MockNotifier {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn info_count(&self) -> usize {
        self.infos.lock().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl Notifier for MockNotifier {
    fn show_info(&self, caption: &str, message: &str) {
        let mut infos = self.infos.lock().unwrap();
        infos.push((caption.to_string(), message.to_string()));
    }

    fn show_error(&self, caption: &str, message: &str) {
        let mut errors = self.errors.lock().unwrap();
        errors.push((caption.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn reporting_defaults_to_both_channels() {
        assert_eq!(
            Reporting::default(),
            Reporting {
                success: true,
                errors: true
            }
        );
    }

    #[test]
    fn success_shows_one_info_box_and_exits_zero() {
        let notifier = MockNotifier::new();
        let dir = PathBuf::from("/games/example");

        let code = report_outcome(
            &Ok(InstallOutcome::Installed),
            &dir,
            Reporting::default(),
            &notifier,
        );

        assert_eq!(code, 0);
        assert_eq!(notifier.error_count(), 0);
        let infos = notifier.infos.lock().unwrap();
        assert_eq!(
            *infos,
            vec![(
                "Success".to_string(),
                "DLSS file installed successfully".to_string()
            )]
        );
    }

    #[test]
    fn silent_success_shows_nothing() {
        let notifier = MockNotifier::new();
        let reporting = Reporting {
            success: false,
            errors: true,
        };

        let code = report_outcome(
            &Ok(InstallOutcome::AlreadyInstalled),
            Path::new("/games/example"),
            reporting,
            &notifier,
        );

        assert_eq!(code, 0);
        assert_eq!(notifier.info_count(), 0);
        assert_eq!(notifier.error_count(), 0);
    }

    #[test]
    fn failure_box_carries_code_and_path() {
        let notifier = MockNotifier::new();
        let dir = PathBuf::from("/games/example");

        let code = report_outcome(
            &Err(InstallError::FileNotFound),
            &dir,
            Reporting::default(),
            &notifier,
        );

        assert_eq!(code, 2);
        assert_eq!(notifier.info_count(), 0);
        let errors = notifier.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "Fatal Error");
        assert_eq!(
            errors[0].1,
            format!(
                "DLSS file not found\r\n\r\nError code: 2\r\nCurrent path: {}",
                dir.display()
            )
        );
    }

    #[test]
    fn quiet_failure_still_exits_nonzero() {
        let notifier = MockNotifier::new();
        let reporting = Reporting {
            success: true,
            errors: false,
        };

        let code = report_outcome(
            &Err(InstallError::InvalidFile),
            Path::new("/games/example"),
            reporting,
            &notifier,
        );

        assert_eq!(code, 3);
        assert_eq!(notifier.info_count(), 0);
        assert_eq!(notifier.error_count(), 0);
    }

    #[test]
    fn error_body_layout_is_stable() {
        let body = error_body("DLSS file is invalid", 3, Path::new("/games/example"));

        assert_eq!(
            body,
            "DLSS file is invalid\r\n\r\nError code: 3\r\nCurrent path: /games/example"
        );
    }
}
