use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::layout::GeneLayout;
use crate::render::document;
use crate::utils::errors::{ReadWriteError, VizError};

/// Preface expected by most SVG consumers when the file is opened standalone
const PREFACE: &str = "<?xml version=\"1.0\" standalone=\"no\"?>\r\n";

/// Writes rendered [`GeneLayout`]s as standalone SVG files
///
/// # Examples
///
/// ```rust
/// use isoviz::render::Writer;
/// use isoviz::tests::genes::{standard_datasets, standard_gene};
///
/// let layout = isoviz::layout_gene(&standard_gene(), &standard_datasets()).unwrap();
///
/// let output = Vec::new(); // substitute this with proper IO (io::stdout())
/// let mut writer = Writer::new(output);
/// writer.write_layout(&layout).unwrap();
///
/// let svg_output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert!(svg_output.starts_with("<?xml version=\"1.0\" standalone=\"no\"?>"));
/// ```
pub struct Writer<W: std::io::Write> {
    inner: BufWriter<W>,
}

impl Writer<File> {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::create(path.as_ref()) {
            Ok(file) => Ok(Self::new(file)),
            Err(err) => Err(ReadWriteError::new(err)),
        }
    }
}

impl<W: std::io::Write> Writer<W> {
    /// Creates a new generic Writer for any `std::io::Write` object
    pub fn new(writer: W) -> Self {
        Writer {
            inner: BufWriter::new(writer),
        }
    }

    pub fn with_capacity(capacity: usize, writer: W) -> Self {
        Writer {
            inner: BufWriter::with_capacity(capacity, writer),
        }
    }

    pub fn flush(&mut self) -> Result<(), VizError> {
        match self.inner.flush() {
            Ok(res) => Ok(res),
            Err(err) => Err(VizError::from(err.to_string())),
        }
    }

    pub fn into_inner(self) -> Result<W, VizError> {
        match self.inner.into_inner() {
            Ok(res) => Ok(res),
            Err(err) => Err(VizError::from(err.to_string())),
        }
    }

    /// Renders the layout and writes it as a standalone SVG document
    pub fn write_layout(&mut self, layout: &GeneLayout) -> Result<(), std::io::Error> {
        self.inner.write_all(PREFACE.as_bytes())?;
        svg::write(&mut self.inner, &document(layout))?;
        self.inner.write_all(b"\n")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::{Dims, GeneLayout};
    use crate::tests::genes::{standard_datasets, standard_gene};

    #[test]
    fn test_write_layout() {
        let layout =
            GeneLayout::compute(&standard_gene(), &standard_datasets(), &Dims::default())
                .unwrap();
        let mut writer = Writer::new(Vec::new());
        writer.write_layout(&layout).expect("Error writing SVG");
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(output.starts_with(PREFACE));
        assert!(output.contains("<svg"));
        assert!(output.ends_with("</svg>\n"));
    }
}
