//! Where dump directives write, and how they terminate.

use std::io::{self, Write};

/// Output sink and terminate signal used by dump directives.
pub trait Host {
    /// Writer receiving dumped documents.
    fn stdout(&mut self) -> Box<dyn Write + '_>;

    /// Called once a dump has been written.
    fn exit(&mut self);
}

/// The running process: writes to stdout and exits with status 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessHost;

impl Host for ProcessHost {
    fn stdout(&mut self) -> Box<dyn Write + '_> {
        Box::new(io::stdout().lock())
    }

    fn exit(&mut self) {
        std::process::exit(0);
    }
}
