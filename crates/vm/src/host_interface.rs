use std::collections::VecDeque;
use std::fmt::Debug;
use std::io;

use time::{OffsetDateTime, UtcOffset};

/// Host services the kernel needs besides guest memory: the console and the
/// wall clock.
pub trait HostInterface: Debug {
    /// Blocks for the next console byte. `None` at end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// True if [`HostInterface::read_byte`] would not block.
    fn input_ready(&mut self) -> bool;

    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Reads at most `max` bytes, stopping after a newline (which is kept).
    fn read_line(&mut self, max: usize) -> io::Result<Vec<u8>> {
        let mut line = Vec::new();
        while line.len() < max {
            match self.read_byte()? {
                Some(byte) => {
                    line.push(byte);
                    if byte == b'\n' {
                        break;
                    }
                }
                None => break,
            }
        }
        Ok(line)
    }

    /// Offset used to present host timestamps as guest local time.
    fn local_offset(&self) -> UtcOffset;

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.local_offset())
    }
}

/// Console on the process's stdin/stdout.
#[derive(Debug)]
pub struct StdHost {
    offset: UtcOffset,
}

impl StdHost {
    /// Captures the local UTC offset. Call before spawning threads; the
    /// lookup falls back to UTC when it cannot be done soundly.
    pub fn new() -> Self {
        Self {
            offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl HostInterface for StdHost {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        loop {
            // Unbuffered so `input_ready` sees exactly what is pending.
            // SAFETY: stdin stays open for the life of the process and `byte`
            // is a live one-byte buffer for the duration of the call.
            let n = unsafe { libc::read(libc::STDIN_FILENO, (&mut byte as *mut u8).cast(), 1) };
            match n {
                1 => return Ok(Some(byte)),
                0 => return Ok(None),
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() != io::ErrorKind::Interrupted {
                        return Err(err);
                    }
                }
            }
        }
    }

    fn input_ready(&mut self) -> bool {
        let mut fds = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `fds` is a single initialized pollfd on the stack and the
        // count passed is 1; a zero timeout never blocks.
        let n = unsafe { libc::poll(&mut fds, 1, 0) };
        n > 0 && fds.revents & libc::POLLIN != 0
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        use std::io::Write;
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }

    fn local_offset(&self) -> UtcOffset {
        self.offset
    }
}

#[cfg(not(unix))]
impl HostInterface for StdHost {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;
        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    fn input_ready(&mut self) -> bool {
        false
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        use std::io::Write;
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }

    fn local_offset(&self) -> UtcOffset {
        self.offset
    }
}

/// In-memory console with a fixed clock. Input is pre-loaded, output is
/// captured.
#[derive(Debug)]
pub struct BufferedHost {
    input: VecDeque<u8>,
    output: Vec<u8>,
    clock: OffsetDateTime,
}

impl BufferedHost {
    pub fn new() -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            clock: OffsetDateTime::UNIX_EPOCH,
        }
    }

    pub fn with_input(input: &[u8]) -> Self {
        let mut host = Self::new();
        host.push_input(input);
        host
    }

    pub fn push_input(&mut self, input: &[u8]) {
        self.input.extend(input);
    }

    pub fn set_clock(&mut self, clock: OffsetDateTime) {
        self.clock = clock;
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}

impl Default for BufferedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostInterface for BufferedHost {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn input_ready(&mut self) -> bool {
        !self.input.is_empty()
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn local_offset(&self) -> UtcOffset {
        self.clock.offset()
    }

    fn now(&self) -> OffsetDateTime {
        self.clock
    }
}
