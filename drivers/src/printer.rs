/*++

Licensed under the Apache-2.0 license.

File Name:

    printer.rs

Abstract:

    File contains support routines and macros to print loader diagnostics.

--*/
use core::convert::Infallible;
use ufmt::{uDisplay, uWrite};
use xloader_error::LoaderError;

#[derive(Default)]
pub struct Printer;

impl uWrite for Printer {
    type Error = Infallible;

    /// Writes a string slice into this writer, returning whether the write succeeded.
    #[cfg(not(feature = "std"))]
    #[inline(never)]
    fn write_str(&mut self, _str: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Writes a string slice into this writer, returning whether the write succeeded.
    #[cfg(feature = "std")]
    fn write_str(&mut self, str: &str) -> Result<(), Self::Error> {
        print!("{str}");
        Ok(())
    }
}

#[macro_export]
macro_rules! cprint {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwrite!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

#[macro_export]
macro_rules! cprintln {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwriteln!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

/// Detailed output, compiled in only with the `verbose` feature
#[cfg(feature = "verbose")]
#[macro_export]
macro_rules! cprintln_verbose {
    ($($tt:tt)*) => {
        $crate::cprintln!($($tt)*)
    }
}

#[cfg(not(feature = "verbose"))]
#[macro_export]
macro_rules! cprintln_verbose {
    ($($tt:tt)*) => {{}};
}

#[macro_export]
macro_rules! cprint_slice  {
    ($name:expr, $arr:expr) => {
        $crate::cprint!("{} = ", $name);
        for byte in $arr {
            $crate::cprint!("{:02X}", *byte);
        }
        $crate::cprintln!("");
    }
}

pub struct HexBytes<'a>(pub &'a [u8]);
impl uDisplay for HexBytes<'_> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        for &x in self.0.iter() {
            f.write_char(hex_digit(x >> 4))?;
            f.write_char(hex_digit(x & 0xf))?;
        }
        Ok(())
    }
}

/// Prints an error as `0x<code> <description>`
pub struct ErrorDisplay(pub LoaderError);
impl uDisplay for ErrorDisplay {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        ufmt::uwrite!(f, "0x{:08x} {}", u32::from(self.0), self.0.description())
    }
}

fn hex_digit(nibble: u8) -> char {
    if nibble < 10 {
        (nibble + b'0') as char
    } else {
        (nibble - 10 + b'A') as char
    }
}
