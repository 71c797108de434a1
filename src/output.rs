//! Progress output helpers for the gate CLI.
//!
//! Progress goes to stderr so stdout stays reserved for machine-readable
//! report output.

use std::io::Write;

/// Write one line to the given stderr handle, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_the_message_and_a_newline() {
        let mut stderr = Vec::new();
        write_stderr_line(&mut stderr, "staging pkg==1.0");
        assert_eq!(String::from_utf8(stderr).expect("UTF-8"), "staging pkg==1.0\n");
    }

    #[test]
    fn tolerates_a_failing_writer() {
        struct FailingWriter;

        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        // Must not panic.
        write_stderr_line(&mut FailingWriter, "dropped");
    }
}
