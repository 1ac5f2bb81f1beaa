use std::io::{self, BufRead, Write};

use tracker_core::HostIdentifier;
use tracker_engine::UiControl;
use tracker_logging::{tracker_info, tracker_warn};

/// Terminal stand-in for the on-page settings control.
#[derive(Debug, Default)]
pub struct ConsoleUi {
    installed: bool,
}

impl UiControl for ConsoleUi {
    fn ensure_control_present(&mut self) {
        if !self.installed {
            self.installed = true;
            tracker_info!("Settings available: restart with --prompt-host to change the host ID");
        }
    }

    fn prompt_for_host_identifier(&mut self, current: &HostIdentifier) -> Option<String> {
        eprint!("Enter Dashboard Host ID [{current}]: ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(err) => {
                tracker_warn!("Could not read host ID: {err}");
                None
            }
        }
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}
