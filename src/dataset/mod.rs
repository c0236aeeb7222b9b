//! Restaurant dataset loading.
//!
//! The dataset is a CSV exported by the offline pipeline, one row per
//! restaurant, in the same row order as the vector index. That alignment is
//! load-bearing: `Restaurant::row` is both the position in the returned
//! collection and the row of the restaurant's embedding in the index, so
//! loading must never drop, sort, or reorder rows. Malformed cells degrade
//! field-by-field instead.

mod error;


pub use error::DatasetError;

use std::path::Path;

use tracing::{info, warn};

use crate::geo::parse_zipcode;

/// One restaurant, immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    /// Position in the collection; equals the vector index row.
    pub row: usize,
    pub name: String,
    pub boro: String,
    pub buildings: String,
    pub street: String,
    /// `"{buildings} {street}"`, trimmed.
    pub address: String,
    pub zipcode: Option<u32>,
    pub cuisine_type: String,
    pub rating: Option<f32>,
    pub review: Option<String>,
    pub review_clean: Option<String>,
    pub link: Option<String>,
}

/// Column names as written by the offline export.
const COLUMNS: &[&str] = &[
    "Name",
    "BORO",
    "Buildings",
    "Street",
    "Zipcode",
    "Type",
    "Rating",
    "Review",
    "Review_clean",
    "link",
];

/// Loads the restaurant collection from a CSV file.
///
/// Row order is preserved exactly. Rows the CSV reader itself cannot produce
/// are dropped with a loud warning since that shifts every later row against
/// the vector index.
pub fn load_restaurants<P: AsRef<Path>>(path: P) -> Result<Vec<Restaurant>, DatasetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let col = |name: &'static str| -> Result<usize, DatasetError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DatasetError::MissingColumn { column: name })
    };
    let idx: Vec<usize> = COLUMNS
        .iter()
        .map(|&c| col(c))
        .collect::<Result<_, _>>()?;
    let [name_i, boro_i, buildings_i, street_i, zipcode_i, type_i, rating_i, review_i, review_clean_i, link_i] =
        idx[..]
    else {
        unreachable!("COLUMNS has a fixed length");
    };

    let mut restaurants = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                // Dropping a row desyncs every later row from the index.
                warn!(row, error = %e, "Skipping unreadable dataset row; index alignment is broken from here on");
                continue;
            }
        };

        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        let opt_field = |i: usize| {
            let v = field(i);
            (!v.is_empty()).then_some(v)
        };

        let buildings = field(buildings_i);
        let street = field(street_i);
        let address = format!("{buildings} {street}").trim().to_string();

        restaurants.push(Restaurant {
            row,
            name: field(name_i),
            boro: field(boro_i),
            zipcode: parse_zipcode(record.get(zipcode_i).unwrap_or("")),
            cuisine_type: field(type_i),
            rating: record
                .get(rating_i)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse::<f32>().ok()),
            review: opt_field(review_i),
            review_clean: opt_field(review_clean_i),
            link: opt_field(link_i),
            buildings,
            street,
            address,
        });
    }

    info!(
        path = %path.display(),
        restaurants = restaurants.len(),
        "Restaurant dataset loaded"
    );

    Ok(restaurants)
}
