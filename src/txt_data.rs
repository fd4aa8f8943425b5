use crate::error::Result;
use std::io::prelude::*;
use std::path::Path;

/// A line-oriented data file of whitespace separated records.
#[derive(Debug)]
pub struct DataFile {
    buf: String,
}

impl DataFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DataFile> {
        let mut file = std::fs::File::open(path)?;
        Self::from_reader(&mut file)
    }

    pub fn from_reader<B: Read>(reader: &mut B) -> Result<DataFile> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(DataFile {
            buf: String::from_utf8_lossy(&buf).into_owned(),
        })
    }

    pub fn from_text<S: Into<String>>(buf: S) -> DataFile {
        DataFile { buf: buf.into() }
    }
}

impl DataFile {
    /// Every record whose first field is `ty`, in file order. Lines starting with `;` are comments.
    pub fn records<'a, 'b>(&'a self, ty: &'b str) -> RecordIter<'a, 'b> {
        RecordIter {
            lines: self.buf.lines().enumerate(),
            ty,
        }
    }
}

use std::iter::Enumerate;
use std::str::Lines;
pub struct RecordIter<'a, 'b> {
    lines: Enumerate<Lines<'a>>,
    ty: &'b str,
}

impl<'a, 'b> Iterator for RecordIter<'a, 'b> {
    type Item = Record<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (n, line) = self.lines.next()?;
            let line = line.trim();
            if line.starts_with(';') {
                continue;
            }
            let mut fields = line.split_whitespace();
            if fields.next() == Some(self.ty) {
                break Some(Record {
                    line: n + 1,
                    fields: fields.collect(),
                });
            }
        }
    }
}

/// Fields of one record, without the leading record type.
#[derive(Debug)]
pub struct Record<'a> {
    pub line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&'a str> {
        self.fields.get(i).copied()
    }
}

use std::ops::Index;
impl<'a> Index<usize> for Record<'a> {
    type Output = &'a str;

    fn index(&self, i: usize) -> &Self::Output {
        &self.fields[i]
    }
}
