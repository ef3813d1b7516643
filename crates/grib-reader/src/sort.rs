//! Multi-key ordering of the message list.
//!
//! Sorting never reorders the index itself; it yields a permutation of
//! message indices for display.

use std::cmp::Ordering;

use grib_common::FieldMetadata;

/// Column a message list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Position in the file
    Message,
    ShortName,
    Name,
    Units,
    TypeOfLevel,
    Level,
    Discipline,
    Category,
    Number,
    ReferenceTime,
}

impl SortKey {
    pub const ALL: [SortKey; 10] = [
        SortKey::Message,
        SortKey::ShortName,
        SortKey::Name,
        SortKey::Units,
        SortKey::TypeOfLevel,
        SortKey::Level,
        SortKey::Discipline,
        SortKey::Category,
        SortKey::Number,
        SortKey::ReferenceTime,
    ];

    /// Column heading for a message table.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Message => "#",
            SortKey::ShortName => "shortName",
            SortKey::Name => "name",
            SortKey::Units => "units",
            SortKey::TypeOfLevel => "typeOfLevel",
            SortKey::Level => "level",
            SortKey::Discipline => "discipline",
            SortKey::Category => "parameterCategory",
            SortKey::Number => "parameterNumber",
            SortKey::ReferenceTime => "dataDate",
        }
    }

    fn compare(&self, a: (usize, &FieldMetadata), b: (usize, &FieldMetadata)) -> Ordering {
        let (ia, ma) = a;
        let (ib, mb) = b;
        match self {
            SortKey::Message => ia.cmp(&ib),
            SortKey::ShortName => ma.short_name.cmp(&mb.short_name),
            SortKey::Name => ma.name.cmp(&mb.name),
            SortKey::Units => ma.units.cmp(&mb.units),
            SortKey::TypeOfLevel => ma.type_of_level.cmp(&mb.type_of_level),
            SortKey::Level => match (ma.level, mb.level) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            },
            SortKey::Discipline => ma.discipline.cmp(&mb.discipline),
            SortKey::Category => ma.parameter_category.cmp(&mb.parameter_category),
            SortKey::Number => ma.parameter_number.cmp(&mb.parameter_number),
            SortKey::ReferenceTime => ma.reference_time.cmp(&mb.reference_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Stable multi-key sort over `metadata`, returning message indices.
///
/// Keys are compared in priority order; ties fall through to the next key,
/// and entries equal on every key keep their original relative order.
/// Missing values sort before present ones when ascending.
pub fn sorted_order(metadata: &[&FieldMetadata], keys: &[(SortKey, SortOrder)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..metadata.len()).collect();

    order.sort_by(|&a, &b| {
        keys.iter()
            .map(|(key, direction)| {
                let ordering = key.compare((a, metadata[a]), (b, metadata[b]));
                match direction {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    order
}
