//! Ctrl-C handling. The handler prints a notice and exits right away with
//! whatever exit code the innermost `CleanCancel` scope (if any) selected.
//! Exit code 0 gets the same "interrupted by user" notice as a clean
//! cancellation through end of input.

use std::sync::atomic::{AtomicI32, Ordering};

static INTERRUPT_EXIT_CODE: AtomicI32 = AtomicI32::new(1);

#[cfg(unix)]
pub fn install() {
    let handler = on_sigint as extern "C" fn(libc::c_int);
    // SAFETY: the handler only touches an atomic and calls write/_exit,
    // which are async-signal-safe.
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
pub fn install() {}

#[cfg(unix)]
extern "C" fn on_sigint(_signal: libc::c_int) {
    const INTERRUPTED: &[u8] = "\n❌ Process interrupted. Exiting...\n".as_bytes();
    const CANCELLED: &[u8] = "\n❌ Process interrupted by user. Exiting...\n".as_bytes();

    let code = INTERRUPT_EXIT_CODE.load(Ordering::SeqCst);
    let notice = if code == 0 { CANCELLED } else { INTERRUPTED };
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            notice.as_ptr() as *const libc::c_void,
            notice.len(),
        );
        libc::_exit(code);
    }
}

#[cfg(test)]
pub fn interrupt_exit_code() -> i32 {
    INTERRUPT_EXIT_CODE.load(Ordering::SeqCst)
}

/// While alive, Ctrl-C exits with status 0.
pub struct CleanCancel {
    previous: i32,
}

pub fn clean_cancel() -> CleanCancel {
    CleanCancel {
        previous: INTERRUPT_EXIT_CODE.swap(0, Ordering::SeqCst),
    }
}

impl Drop for CleanCancel {
    fn drop(&mut self) {
        INTERRUPT_EXIT_CODE.store(self.previous, Ordering::SeqCst);
    }
}
