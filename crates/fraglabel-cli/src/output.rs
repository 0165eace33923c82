use fraglabel_core::color::color_directive;
use fraglabel_core::fraction::{Relative, ResidueFraction};
use fraglabel_core::pipeline::Analysis;
use fraglabel_core::MISSING;

use crate::runner::Runner;

fn float(x: f64) -> Vec<u8> {
    ryu::Buffer::new().format(x).as_bytes().to_vec()
}

fn optional(x: Option<f64>) -> Vec<u8> {
    match x {
        Some(x) => float(x),
        None => MISSING.as_bytes().to_vec(),
    }
}

impl Runner {
    /// Serialize the per (bucket, ion, position) intensity grid: three header
    /// rows, then one row per residue position. Unmatched cells are blank
    pub fn serialize_matrix(&self, analysis: &Analysis) -> Vec<csv::ByteRecord> {
        let matrix = &analysis.matrix;
        let mut records = matrix
            .headers()
            .iter()
            .map(|header| csv::ByteRecord::from(header.clone()))
            .collect::<Vec<_>>();

        for (position, (label, reverse_label)) in
            matrix.row_labels(&analysis.sequence).into_iter().enumerate()
        {
            let mut record = csv::ByteRecord::new();
            record.push_field(label.as_bytes());
            let mut previous = None;
            for column in &matrix.columns {
                if previous.map_or(false, |t| t != column.bucket.terminus) {
                    record.push_field(reverse_label.as_bytes());
                }
                match column.cells[position] {
                    Some(x) => record.push_field(&float(x)),
                    None => record.push_field(b""),
                }
                previous = Some(column.bucket.terminus);
            }
            records.push(record);
        }
        records
    }

    pub fn serialize_fraction(&self, label: &str, row: &ResidueFraction) -> csv::ByteRecord {
        let mut record = csv::ByteRecord::new();
        record.push_field(label.as_bytes());
        record.push_field(&float(row.n_numerator));
        record.push_field(&float(row.n_denominator));
        record.push_field(&optional(row.n_fraction));
        record.push_field(&float(row.c_numerator));
        record.push_field(&float(row.c_denominator));
        record.push_field(&optional(row.c_fraction));
        record.push_field(&optional(row.c_fraction_flipped));
        record.push_field(&optional(row.weighted_average));
        record.push_field(&optional(row.evidence));
        match row.relative {
            Relative::Delta(x) => record.push_field(&float(x)),
            Relative::Boundary | Relative::NoData => record.push_field(MISSING.as_bytes()),
        }
        match row.color {
            Some(g) => record.push_field(color_directive(g).as_bytes()),
            None => record.push_field(MISSING.as_bytes()),
        }
        record
    }

    fn write_records(
        &self,
        file_name: String,
        records: impl IntoIterator<Item = csv::ByteRecord>,
    ) -> anyhow::Result<String> {
        let path = self.make_path(file_name);

        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(vec![]);
        for record in records {
            wtr.write_byte_record(&record)?;
        }
        wtr.flush()?;

        let bytes = wtr.into_inner()?;
        std::fs::write(&path, bytes)?;
        Ok(path.to_string_lossy().into_owned())
    }

    pub fn write_matrix(&self, stem: &str, analysis: &Analysis) -> anyhow::Result<String> {
        self.write_records(
            format!("{}.fragment-intensities.csv", stem),
            self.serialize_matrix(analysis),
        )
    }

    pub fn write_sheet(&self, stem: &str, analysis: &Analysis) -> anyhow::Result<String> {
        let headers = csv::ByteRecord::from(vec![
            "",
            "n-terminal numerators",
            "n-terminal denominators",
            "n-terminal fraction",
            "c-terminal numerators",
            "c-terminal denominators",
            "c-terminal fraction",
            "c-terminal fraction flipped",
            "weighted averages",
            "denominator sum",
            "relative label",
            "rgb value",
        ]);

        let records = std::iter::once(headers).chain(
            analysis
                .fractions
                .rows
                .iter()
                .enumerate()
                .map(|(position, row)| {
                    let label = analysis
                        .sequence
                        .position_label(position)
                        .unwrap_or_else(|| (position + 1).to_string());
                    self.serialize_fraction(&label, row)
                }),
        );
        self.write_records(format!("{}.processed-fragment-intensities.csv", stem), records)
    }

    pub fn write_color_script(&self, stem: &str, analysis: &Analysis) -> anyhow::Result<String> {
        let path = self.make_path(format!("{}.color-script.txt", stem));
        std::fs::write(&path, analysis.colors.script())?;
        Ok(path.to_string_lossy().into_owned())
    }
}
