//! Character display boundary

use ufmt::uWrite;

/// A small text display addressed by column and row
pub trait CharDisplay {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Write `value` as unsigned decimal
    fn write_number(&mut self, value: u8) -> Result<(), Self::Error> {
        let mut sink = TextSink(self);
        ufmt::uwrite!(sink, "{}", value)
    }
}

struct TextSink<'a, D: ?Sized>(&'a mut D);

impl<D: CharDisplay + ?Sized> uWrite for TextSink<'_, D> {
    type Error = D::Error;

    fn write_str(&mut self, s: &str) -> Result<(), D::Error> {
        self.0.write_str(s)
    }
}

/// Shows the display contents on a VT100 terminal
pub struct ConsoleDisplay<W> {
    out: W,
}

impl<W: uWrite> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn free(self) -> W {
        self.out
    }
}

impl<W: uWrite> CharDisplay for ConsoleDisplay<W> {
    type Error = W::Error;

    fn clear(&mut self) -> Result<(), W::Error> {
        self.out.write_str("\x1b[2J\x1b[H")
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), W::Error> {
        let (row, col) = (u16::from(row) + 1, u16::from(col) + 1);
        ufmt::uwrite!(self.out, "\x1b[{};{}H", row, col)
    }

    fn write_str(&mut self, text: &str) -> Result<(), W::Error> {
        self.out.write_str(text)
    }
}
