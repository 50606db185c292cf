//! Batch sizing

use crate::error::{Error, Result};
use crate::stream::{stream_len, CommandGroup};

use super::session::Session;

/// Default erase units per command stream
pub const DEFAULT_ERASE_BLOCKS: u32 = 64;
/// Default page reads per command stream
pub const DEFAULT_READ_PAGES: u32 = 128;
/// Default page programs per command stream
pub const DEFAULT_PROGRAM_PAGES: u32 = 128;

/// Number of units packed into each command stream
///
/// A configuration only applies to a session once it has been checked
/// against it: the `validate_*` checks reject a size that overflows the
/// command or swap buffer of that operation, [`fitted`](Self::fitted)
/// shrinks them instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    erase_blocks: u32,
    read_pages: u32,
    program_pages: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            erase_blocks: DEFAULT_ERASE_BLOCKS,
            read_pages: DEFAULT_READ_PAGES,
            program_pages: DEFAULT_PROGRAM_PAGES,
        }
    }
}

impl BatchConfig {
    /// Create a configuration. Zero sizes are raised to one.
    pub fn new(erase_blocks: u32, read_pages: u32, program_pages: u32) -> Self {
        Self {
            erase_blocks: erase_blocks.max(1),
            read_pages: read_pages.max(1),
            program_pages: program_pages.max(1),
        }
    }

    /// Erase units per command stream
    pub fn erase_blocks(&self) -> u32 {
        self.erase_blocks
    }

    /// Page reads per command stream
    pub fn read_pages(&self) -> u32 {
        self.read_pages
    }

    /// Page programs per command stream
    pub fn program_pages(&self) -> u32 {
        self.program_pages
    }

    /// Check the erase batch against the session's command buffer
    ///
    /// Erase stages nothing in the swap buffer, so only the stream length
    /// matters. Called by the orchestrators before any transport I/O.
    pub fn validate_erase(&self, session: &Session) -> Result<()> {
        session.check_addressable()?;
        check_stream(&erase_unit(), self.erase_blocks, session)
    }

    /// Check the read batch against the command and swap buffers
    pub fn validate_read(&self, session: &Session) -> Result<()> {
        session.check_addressable()?;
        check_stream(&read_unit(session), self.read_pages, session)?;
        check_swap(self.read_pages, session)
    }

    /// Check the program batch against the command and swap buffers
    pub fn validate_program(&self, session: &Session) -> Result<()> {
        session.check_addressable()?;
        check_stream(&program_unit(session), self.program_pages, session)?;
        check_swap(self.program_pages, session)
    }

    /// Shrink every batch size to the largest that fits the session
    ///
    /// A kind where not even one unit fits is left at one unit; the matching
    /// `validate_*` call reports it once an operation of that kind runs.
    pub fn fitted(&self, session: &Session) -> Result<Self> {
        session.check_addressable()?;
        let page_size = session.page_size().max(1);
        let by_swap = (session.swap_len() / page_size) as u32;

        let fitted = Self::new(
            self.erase_blocks.min(max_units(&erase_unit(), session)?),
            self.read_pages
                .min(max_units(&read_unit(session), session)?)
                .min(by_swap),
            self.program_pages
                .min(max_units(&program_unit(session), session)?)
                .min(by_swap),
        );
        if fitted != *self {
            log::debug!(
                "Batch sizes fitted to session: erase {}, read {}, program {}",
                fitted.erase_blocks,
                fitted.read_pages,
                fitted.program_pages
            );
        }
        Ok(fitted)
    }
}

fn erase_unit() -> CommandGroup {
    CommandGroup::EraseBlock { page: 0 }
}

fn read_unit(session: &Session) -> CommandGroup {
    CommandGroup::ReadPage {
        page: 0,
        dest: session.swap_base(),
        len: session.chip.page_size,
    }
}

fn program_unit(session: &Session) -> CommandGroup {
    CommandGroup::ProgramPage {
        page: 0,
        src: session.swap_base(),
        len: session.chip.page_size,
    }
}

fn check_stream(unit: &CommandGroup, units: u32, session: &Session) -> Result<()> {
    let needed = stream_len(unit, units as usize)?;
    if needed > session.cmd_len() {
        return Err(Error::BufferTooLarge {
            needed,
            capacity: session.cmd_len(),
        });
    }
    Ok(())
}

fn check_swap(pages: u32, session: &Session) -> Result<()> {
    let needed = pages as usize * session.page_size();
    if needed > session.swap_len() {
        return Err(Error::BufferTooLarge {
            needed,
            capacity: session.swap_len(),
        });
    }
    Ok(())
}

fn max_units(unit: &CommandGroup, session: &Session) -> Result<u32> {
    let per_unit = unit.encoded_len()?;
    let room = session.cmd_len().saturating_sub(stream_len(unit, 0)?);
    Ok((room / per_unit) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::{self, ChipDescriptor};
    use crate::stream::{ERASE_UNIT_LEN, PROGRAM_UNIT_LEN, READ_UNIT_LEN};
    use crate::transport::SwapInfo;

    fn session(chip: &'static ChipDescriptor, swap_len: u32, cmd_len: u32) -> Session {
        Session::new(
            chip,
            SwapInfo {
                swap_base: 0x0002_0000,
                swap_len,
                cmd_len,
            },
        )
    }

    fn w25n01gv() -> &'static ChipDescriptor {
        chip::find_by_name("W25N01GV").unwrap()
    }

    #[test]
    fn test_defaults_fit_a_large_target() {
        let s = session(w25n01gv(), 128 * 2048, 4096 + 1);
        let config = BatchConfig::default();
        assert_eq!(config.validate_erase(&s), Ok(()));
        assert_eq!(config.validate_read(&s), Ok(()));
        assert_eq!(config.validate_program(&s), Ok(()));
    }

    #[test]
    fn test_program_stream_too_long() {
        // 128 program units need 4097 bytes, 128 reads only 3585
        let s = session(w25n01gv(), 1024 * 1024, 4096);
        let config = BatchConfig::default();
        assert_eq!(
            config.validate_program(&s),
            Err(Error::BufferTooLarge {
                needed: 128 * PROGRAM_UNIT_LEN + 1,
                capacity: 4096
            })
        );
        assert_eq!(config.validate_read(&s), Ok(()));
        assert_eq!(config.validate_erase(&s), Ok(()));
    }

    #[test]
    fn test_swap_too_small() {
        let s = session(w25n01gv(), 64 * 2048, 65536);
        let config = BatchConfig::default();
        let err = Err(Error::BufferTooLarge {
            needed: 128 * 2048,
            capacity: 64 * 2048,
        });
        assert_eq!(config.validate_read(&s), err);
        assert_eq!(config.validate_program(&s), err);
        // Erase never touches the swap buffer
        assert_eq!(config.validate_erase(&s), Ok(()));
    }

    #[test]
    fn test_fitted_shrinks() {
        let s = session(w25n01gv(), 16 * 2048, 1024);
        let fitted = BatchConfig::default().fitted(&s).unwrap();
        assert_eq!(fitted.erase_blocks(), (1023 / ERASE_UNIT_LEN) as u32);
        assert_eq!(fitted.read_pages(), 16);
        assert_eq!(fitted.program_pages(), 16);
        assert_eq!(fitted.validate_erase(&s), Ok(()));
        assert_eq!(fitted.validate_read(&s), Ok(()));
        assert_eq!(fitted.validate_program(&s), Ok(()));
        assert!(fitted.read_pages() as usize * READ_UNIT_LEN < 1024);
    }

    #[test]
    fn test_fitted_keeps_smaller_sizes() {
        let s = session(w25n01gv(), 1024 * 1024, 65536);
        let config = BatchConfig::new(4, 8, 2);
        assert_eq!(config.fitted(&s).unwrap(), config);
    }

    #[test]
    fn test_fitted_page_larger_than_swap() {
        let chip = chip::find_by_name("GD5F4GQ4UBxIG").unwrap();
        let s = session(chip, 2048, 65536);
        let fitted = BatchConfig::default().fitted(&s).unwrap();
        assert_eq!(fitted.read_pages(), 1);
        assert_eq!(fitted.program_pages(), 1);
        assert_eq!(fitted.validate_erase(&s), Ok(()));
        assert_eq!(
            fitted.validate_read(&s),
            Err(Error::BufferTooLarge {
                needed: 4096,
                capacity: 2048
            })
        );
    }

    #[test]
    fn test_fitted_command_buffer_too_small() {
        let s = session(w25n01gv(), 1024 * 1024, 16);
        let fitted = BatchConfig::default().fitted(&s).unwrap();
        assert_eq!(
            fitted.validate_erase(&s),
            Err(Error::BufferTooLarge {
                needed: ERASE_UNIT_LEN + 1,
                capacity: 16
            })
        );
    }

    #[test]
    fn test_zero_sizes_raised() {
        let config = BatchConfig::new(0, 0, 0);
        assert_eq!(config.erase_blocks(), 1);
        assert_eq!(config.read_pages(), 1);
        assert_eq!(config.program_pages(), 1);
    }
}
