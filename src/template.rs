//! Lays out already compiled fragments around the SELECT keywords.
//!
//! Nothing here compiles anything; every clause whose fragment list or value
//! is empty is left out entirely.

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectTemplateValues {
    pub fields: Vec<String>,
    pub measurement: Option<String>,
    pub where_terms: Vec<String>,
    pub group_by: Vec<String>,
    pub fill: Option<String>,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub slimit: Option<u64>,
    pub soffset: Option<u64>,
}

impl SelectTemplateValues {
    pub fn render(&self) -> String {
        let mut out = String::from("SELECT ");

        if self.fields.is_empty() {
            out.push('*');
        } else {
            out.push_str(&self.fields.join(", "));
        }

        if let Some(measurement) = &self.measurement {
            out.push_str(&format!(" FROM {}", measurement));
        }
        if !self.where_terms.is_empty() {
            out.push_str(&format!(" WHERE {}", self.where_terms.join(" ")));
        }
        if !self.group_by.is_empty() {
            out.push_str(&format!(" GROUP BY {}", self.group_by.join(", ")));
        }
        if let Some(fill) = self.fill.as_deref().filter(|f| !f.is_empty()) {
            out.push_str(&format!(" fill({})", fill));
        }
        if !self.order_by.is_empty() {
            out.push_str(&format!(" ORDER BY {}", self.order_by.join(", ")));
        }

        for (keyword, value) in [
            ("LIMIT", self.limit),
            ("OFFSET", self.offset),
            ("SLIMIT", self.slimit),
            ("SOFFSET", self.soffset),
        ] {
            if let Some(n) = value {
                out.push_str(&format!(" {} {}", keyword, n));
            }
        }

        out
    }
}
