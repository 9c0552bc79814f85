use std::path::PathBuf;

use crate::epl::document_to_epl;
use crate::error::PrintError;
use crate::page::PrintDocument;

/// What a sink reports back once the job has been handed off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintReceipt {
    pub pages: usize,
    pub destination: String,
}

/// Somewhere a composed document can be sent.
pub trait PrintSink {
    fn submit(&mut self, doc: &PrintDocument) -> Result<PrintReceipt, PrintError>;
}

/// Writes `page-001.png`, `page-002.png`, … into a directory.
#[derive(Debug, Clone)]
pub struct PngDirectory {
    dir: PathBuf,
}

impl PngDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PrintSink for PngDirectory {
    fn submit(&mut self, doc: &PrintDocument) -> Result<PrintReceipt, PrintError> {
        if doc.is_empty() {
            return Err(PrintError::Empty);
        }
        std::fs::create_dir_all(&self.dir)?;
        for (i, png) in doc.to_png_pages()?.iter().enumerate() {
            let path = self.dir.join(format!("page-{:03}.png", i + 1));
            std::fs::write(&path, png)?;
            tracing::debug!(path = %path.display(), "page written");
        }
        Ok(PrintReceipt {
            pages: doc.pages.len(),
            destination: self.dir.display().to_string(),
        })
    }
}

/// Sends the document as an EPL2 job to a named Windows printer queue.
#[derive(Debug, Clone)]
pub struct RawPrinter {
    name: String,
}

impl RawPrinter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PrintSink for RawPrinter {
    fn submit(&mut self, doc: &PrintDocument) -> Result<PrintReceipt, PrintError> {
        if doc.is_empty() {
            return Err(PrintError::Empty);
        }
        let job = document_to_epl(doc);
        tracing::info!(printer = %self.name, bytes = job.len(), pages = doc.pages.len(), "sending raw job");
        send_raw_to_printer(&self.name, &job)?;
        Ok(PrintReceipt {
            pages: doc.pages.len(),
            destination: self.name.clone(),
        })
    }
}

/// Send raw bytes to the named printer. On non-Windows this function returns an error.
pub fn send_raw_to_printer(printer_name: &str, data: &[u8]) -> Result<(), PrintError> {
    #[cfg(target_os = "windows")]
    {
        use std::ffi::OsStr;
        use std::iter::once;
        use std::os::windows::ffi::OsStrExt;
        use std::ptr::null_mut;
        use winapi::shared::minwindef::*;
        use winapi::shared::ntdef::LPWSTR;
        use winapi::um::winspool::*;

        let wide = |s: &str| -> Vec<u16> { OsStr::new(s).encode_wide().chain(once(0)).collect() };
        let mut wide_name = wide(printer_name);
        let mut wide_doc = wide("Barcode labels");
        let mut wide_raw = wide("RAW");

        unsafe {
            let mut handle: *mut winapi::ctypes::c_void = null_mut();
            if OpenPrinterW(wide_name.as_mut_ptr() as LPWSTR, &mut handle as *mut _ as *mut _, null_mut()) == 0 {
                return Err(PrintError::Spooler(format!("OpenPrinterW failed for {printer_name}")));
            }

            let mut doc_info = DOC_INFO_1W {
                pDocName: wide_doc.as_mut_ptr() as LPWSTR,
                pOutputFile: null_mut(),
                pDatatype: wide_raw.as_mut_ptr() as LPWSTR,
            };

            if StartDocPrinterW(handle as *mut _, 1, &mut doc_info as *mut _ as *mut _) == 0 {
                ClosePrinter(handle as *mut _);
                return Err(PrintError::Spooler("StartDocPrinterW failed".into()));
            }

            if StartPagePrinter(handle as *mut _) == 0 {
                EndDocPrinter(handle as *mut _);
                ClosePrinter(handle as *mut _);
                return Err(PrintError::Spooler("StartPagePrinter failed".into()));
            }

            let mut written: DWORD = 0;
            let ok = WritePrinter(
                handle as *mut _,
                data.as_ptr() as *mut _,
                data.len() as DWORD,
                &mut written as *mut DWORD,
            );

            EndPagePrinter(handle as *mut _);
            EndDocPrinter(handle as *mut _);
            ClosePrinter(handle as *mut _);

            if ok == 0 {
                return Err(PrintError::Spooler("WritePrinter failed".into()));
            }
            Ok(())
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = data;
        Err(PrintError::Spooler(format!(
            "cannot reach {printer_name}: raw printing uses the Win32 spooler"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tempfile::TempDir;

    fn doc(pages: usize) -> PrintDocument {
        PrintDocument {
            dpi: 96,
            pages: vec![GrayImage::from_pixel(8, 8, Luma([255])); pages],
        }
    }

    #[test]
    fn png_directory_writes_each_page() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("labels");
        let receipt = PngDirectory::new(&dir).submit(&doc(2)).unwrap();
        assert_eq!(receipt.pages, 2);
        assert!(dir.join("page-001.png").exists());
        assert!(dir.join("page-002.png").exists());
        assert!(!dir.join("page-003.png").exists());
    }

    #[test]
    fn empty_documents_are_refused() {
        assert!(matches!(PngDirectory::new("unused").submit(&doc(0)), Err(PrintError::Empty)));
        assert!(matches!(RawPrinter::new("Zebra LP2824").submit(&doc(0)), Err(PrintError::Empty)));
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn raw_printing_needs_windows() {
        assert!(matches!(RawPrinter::new("Zebra LP2824").submit(&doc(1)), Err(PrintError::Spooler(_))));
    }
}
