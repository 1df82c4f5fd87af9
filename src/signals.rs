//! Interrupt and fault reporting.
//!
//! Both handlers are registered once at startup. Neither touches the
//! listing state: the interrupt handler only writes a notice and stays
//! armed, and the fault hook reports and terminates.

use std::io::{self, Write};

/// Exit status used when a fault is caught (the numeric value of SIGSEGV).
pub const FAULT_EXIT_STATUS: i32 = 11;

/// Line printed when the user interrupts a run.
pub const INTERRUPT_NOTICE: &str = "Don't do that\n";

/// Installs the fault hook and the interrupt handler.
///
/// Fails only if an interrupt handler was already registered.
pub fn install() -> Result<(), ctrlc::Error> {
    install_fault_hook();
    let mut sink = notice_sink();
    ctrlc::set_handler(move || {
        let _ = write_interrupt_notice(&mut sink);
    })
}

/// Writes the interrupt notice in a single write and flushes.
pub fn write_interrupt_notice<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(INTERRUPT_NOTICE.as_bytes())?;
    out.flush()
}

/// An unbuffered duplicate of stdout, so the notice never waits on the
/// lock held while the report is printed.
#[cfg(unix)]
fn notice_sink() -> Box<dyn Write + Send> {
    use std::os::fd::AsFd;

    match io::stdout().as_fd().try_clone_to_owned() {
        Ok(fd) => Box::new(std::fs::File::from(fd)),
        Err(_) => Box::new(io::stdout()),
    }
}

#[cfg(not(unix))]
fn notice_sink() -> Box<dyn Write + Send> {
    Box::new(io::stdout())
}

/// Replaces the default panic output with a fault report and a fixed exit
/// status. No cleanup of in-flight state is attempted.
pub fn install_fault_hook() {
    std::panic::set_hook(Box::new(|info| {
        let _ = io::stdout().flush();
        eprintln!("Caught fault: {}", info);
        let _ = io::stderr().flush();
        std::process::exit(FAULT_EXIT_STATUS);
    }));
}
