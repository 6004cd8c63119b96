//! Dense per-timestep result table: one row per simulated date, one column
//! per `component.output` pair that appeared in the network.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<(NaiveDate, BTreeMap<String, f64>)>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn push_row(&mut self, date: NaiveDate, values: BTreeMap<String, f64>) {
        self.rows.push((date, values));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[(NaiveDate, BTreeMap<String, f64>)] {
        &self.rows
    }

    /// All column names that appeared in at least one row, sorted.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .rows
            .iter()
            .flat_map(|(_, values)| values.keys().cloned())
            .collect();
        columns.sort();
        columns.dedup();
        columns
    }

    pub fn to_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let columns = self.columns();
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec!["date".to_string()];
        header.extend(columns.iter().cloned());
        csv_writer.write_record(&header)?;

        for (date, values) in &self.rows {
            let mut record = vec![date.format("%Y-%m-%d").to_string()];
            for column in &columns {
                let value = values.get(column).copied().unwrap_or(0.0);
                record.push(value.to_string());
            }
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_output_has_one_row_per_date() {
        let mut table = ResultTable::new();
        let mut row = BTreeMap::new();
        row.insert("a.total".to_string(), 1.0);
        table.push_row(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), row);

        let mut buffer = Vec::new();
        table.to_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("a.total"));
    }

    #[test]
    fn missing_column_on_some_rows_defaults_to_zero() {
        let mut table = ResultTable::new();
        let mut row1 = BTreeMap::new();
        row1.insert("a.total".to_string(), 1.0);
        table.push_row(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), row1);

        let mut row2 = BTreeMap::new();
        row2.insert("b.total".to_string(), 2.0);
        table.push_row(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(), row2);

        assert_eq!(table.columns(), vec!["a.total".to_string(), "b.total".to_string()]);
    }
}
