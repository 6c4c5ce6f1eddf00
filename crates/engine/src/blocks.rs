use serde::{Deserialize, Serialize};

/// The four statement groupings whose member cells roll up into one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// "Ações e Opções"
    Equities,
    /// "Renda fixa e outros valores mobiliários"
    FixedIncome,
    /// "Demais receitas"
    OtherIncome,
    /// "Demais despesas"
    OtherExpenses,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Equities,
        Section::FixedIncome,
        Section::OtherIncome,
        Section::OtherExpenses,
    ];

    fn slot(self) -> usize {
        match self {
            Section::Equities => 0,
            Section::FixedIncome => 1,
            Section::OtherIncome => 2,
            Section::OtherExpenses => 3,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equities => write!(f, "equities"),
            Self::FixedIncome => write!(f, "fixed_income"),
            Self::OtherIncome => write!(f, "other_income"),
            Self::OtherExpenses => write!(f, "other_expenses"),
        }
    }
}

/// Running totals in thousands, one slot per section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionTotals([i64; 4]);

impl SectionTotals {
    pub fn get(&self, section: Section) -> i64 {
        self.0[section.slot()]
    }

    pub fn add(&mut self, section: Section, thousands: i64) {
        let slot = &mut self.0[section.slot()];
        *slot = slot.saturating_add(thousands);
    }

    /// Exact sum of the four section totals.
    pub fn grand_total(&self) -> i64 {
        self.0.iter().fold(0i64, |acc, v| acc.saturating_add(*v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, i64)> + '_ {
        Section::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

impl Serialize for SectionTotals {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(4))?;
        for (section, total) in self.iter() {
            map.serialize_entry(&section, &total)?;
        }
        map.end()
    }
}

/// Section-header scanner and accumulator.
///
/// Header rows switch the current section; every rewritten cell adds its
/// thousands value to whichever section is current. Cells seen before the
/// first header belong to no section.
#[derive(Debug, Clone)]
pub struct BlockAggregator {
    labels: Vec<(String, Section)>,
    current: Option<Section>,
    totals: SectionTotals,
}

impl BlockAggregator {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = (S, Section)>,
        S: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|(label, section)| (label.into().trim().to_string(), section))
                .collect(),
            current: None,
            totals: SectionTotals::default(),
        }
    }

    /// Inspect a row's first-column text; switch section on an exact (trimmed)
    /// label match. Returns the section entered, if any.
    pub fn observe_header(&mut self, first_column: &str) -> Option<Section> {
        let key = first_column.trim();
        let hit = self
            .labels
            .iter()
            .find(|(label, _)| label == key)
            .map(|(_, section)| *section)?;
        if self.current != Some(hit) {
            log::debug!("entering section {hit}");
        }
        self.current = Some(hit);
        Some(hit)
    }

    /// Forget the current section (sheet boundary with per-sheet scope).
    pub fn reset_section(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<Section> {
        self.current
    }

    /// Credit a rewritten cell to the current section. Returns the section
    /// credited, `None` outside any section.
    pub fn record(&mut self, thousands: i64) -> Option<Section> {
        let section = self.current?;
        self.totals.add(section, thousands);
        Some(section)
    }

    pub fn totals(&self) -> SectionTotals {
        self.totals
    }
}
