use crate::error::{LoadError, ParseError};
use log::trace;
use std::collections::HashSet;

/// Raw value of one attribute in one record.
///
/// Lines shorter than the header leave their trailing attributes `Absent`,
/// which is distinct from a present but empty field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Value(String),
    Absent,
}

impl Cell {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Value(s) => Some(s),
            Cell::Absent => None,
        }
    }

    /// Numeric reading of the cell, only if it is a finite number.
    pub fn number(&self) -> Option<f64> {
        let x: f64 = self.as_str()?.trim().parse().ok()?;
        x.is_finite().then_some(x)
    }
}

/// Ordered attribute names of a file, free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header(Vec<String>);

impl Header {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    pub fn position(&self, attribute: &str) -> Option<usize> {
        self.0.iter().position(|name| name == attribute)
    }
}

impl TryFrom<Vec<String>> for Header {
    type Error = ParseError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ParseError::DuplicateAttribute(name.clone()));
            }
        }
        Ok(Header(names))
    }
}

/// One data line, with exactly one cell per header attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record(Vec<Cell>);

impl Record {
    fn from_fields<'a>(header: &Header, fields: impl Iterator<Item = &'a str>) -> Self {
        let mut cells: Vec<Cell> = fields
            .take(header.len())
            .map(|field| Cell::Value(field.to_owned()))
            .collect();
        cells.resize(header.len(), Cell::Absent);
        Record(cells)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }
}

/// Parsed content of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Header,
    pub records: Vec<Record>,
}

impl Table {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty());

        let header = lines.next().ok_or(ParseError::EmptyFile)?;
        let header = Header::try_from(header.split('\t').map(str::to_owned).collect::<Vec<_>>())?;
        trace!("Header: {:?}", header.names());

        let records = lines
            .map(|line| Record::from_fields(&header, line.split('\t')))
            .collect();

        Ok(Table { header, records })
    }
}

/// A parsed file, named after the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub table: Table,
}

impl Dataset {
    pub fn parse(name: &str, text: &str) -> Result<Self, LoadError> {
        let table = Table::parse(text).map_err(|e| LoadError::parse(name, e))?;
        Ok(Dataset {
            name: name.to_owned(),
            table,
        })
    }

    pub fn header(&self) -> &Header {
        &self.table.header
    }

    pub fn records(&self) -> &[Record] {
        &self.table.records
    }
}

/// Rejects files not named with the accepted extension, before any read.
pub fn check_file_name(name: &str, extension: &str) -> Result<(), LoadError> {
    if name.ends_with(extension) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedFileType { file: name.into() })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn value(s: &str) -> Cell {
        Cell::Value(s.into())
    }

    #[test]
    fn parse_table() {
        let table = Table::parse("id\tval1\tval2\nrs1\t0.5\t1.2\nrs2\t0.9\t3.4\n").unwrap();
        assert_eq!(table.header.names(), ["id", "val1", "val2"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(
            table.records[1].cells(),
            [value("rs2"), value("0.9"), value("3.4")]
        );
    }

    #[test]
    fn parse_is_deterministic() {
        let text = "a\tb\n1\t2\n\n3\n";
        assert_eq!(Table::parse(text).unwrap(), Table::parse(text).unwrap());
    }

    #[test]
    fn skip_blank_lines() {
        let table = Table::parse("\n  \t \na\tb\n\n1\t2\n   \n3\t4").unwrap();
        assert_eq!(table.header.names(), ["a", "b"]);
        assert_eq!(table.records.len(), 2);
    }

    #[test]
    fn short_and_long_lines() {
        let table = Table::parse("a\tb\tc\n1\n1\t2\t3\t4\n1\t\t3").unwrap();
        assert_eq!(
            table.records[0].cells(),
            [value("1"), Cell::Absent, Cell::Absent]
        );
        assert_eq!(
            table.records[1].cells(),
            [value("1"), value("2"), value("3")]
        );
        assert_eq!(table.records[2].cells(), [value("1"), value(""), value("3")]);
    }

    #[test]
    fn keep_embedded_spaces() {
        let table = Table::parse("name\tnote\n rs 1 \t a b\n").unwrap();
        assert_eq!(table.records[0].cells(), [value(" rs 1 "), value(" a b")]);
    }

    #[test]
    fn strip_crlf() {
        let table = Table::parse("a\tb\r\n1\t2\r\n").unwrap();
        assert_eq!(table.header.names(), ["a", "b"]);
        assert_eq!(table.records[0].cells(), [value("1"), value("2")]);
    }

    #[test]
    fn empty_file() {
        assert_eq!(Table::parse(""), Err(ParseError::EmptyFile));
        assert_eq!(Table::parse("\n \n\t\n"), Err(ParseError::EmptyFile));
    }

    #[test]
    fn duplicate_attribute() {
        assert_eq!(
            Table::parse("a\tb\ta\n1\t2\t3"),
            Err(ParseError::DuplicateAttribute("a".into()))
        );
    }

    #[test]
    fn lookup_by_attribute() {
        let table = Table::parse("id\tp\nrs1").unwrap();
        let record = &table.records[0];
        let get = |attribute: &str| table.header.position(attribute).map(|i| &record.cells()[i]);
        assert_eq!(get("id"), Some(&value("rs1")));
        assert_eq!(get("p"), Some(&Cell::Absent));
        assert_eq!(get("missing"), None);
    }

    #[test]
    fn numbers() {
        assert_eq!(value("0.5").number(), Some(0.5));
        assert_eq!(value(" -1e-8 ").number(), Some(-1e-8));
        assert_eq!(value("foo").number(), None);
        assert_eq!(value("").number(), None);
        assert_eq!(value("inf").number(), None);
        assert_eq!(value("NaN").number(), None);
        assert_eq!(Cell::Absent.number(), None);
    }

    #[test]
    fn file_names() {
        assert!(check_file_name("snps.tsv", ".tsv").is_ok());
        assert_eq!(
            check_file_name("snps.csv", ".tsv"),
            Err(LoadError::UnsupportedFileType {
                file: "snps.csv".into()
            })
        );
        assert!(check_file_name("snps.TSV", ".tsv").is_err());
        assert!(check_file_name("snps.tsv.gz", ".tsv").is_err());
    }
}
