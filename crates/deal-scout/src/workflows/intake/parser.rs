use super::mapping::{field_for_header, ListingField};
use super::text::present;
use crate::workflows::acquisition::domain::RawListing;
use std::io::Read;

/// Parse a CSV export. Unknown columns are ignored and empty cells stay absent.
pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawListing>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Option<ListingField>> = csv_reader
        .headers()?
        .iter()
        .map(field_for_header)
        .collect();

    let mut listings = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut listing = RawListing::default();
        for (column, cell) in columns.iter().zip(record.iter()) {
            if let (Some(field), Some(value)) = (column, present(cell)) {
                field.assign(&mut listing, value);
            }
        }
        listings.push(listing);
    }

    Ok(listings)
}

/// Parse a JSON array of raw listings, treating blank strings as absent.
pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<RawListing>, serde_json::Error> {
    let listings: Vec<RawListing> = serde_json::from_reader(reader)?;
    Ok(listings.into_iter().map(tidy).collect())
}

fn tidy(mut listing: RawListing) -> RawListing {
    listing.id = listing.id.trim().to_string();
    for slot in [
        &mut listing.title,
        &mut listing.url,
        &mut listing.industry,
        &mut listing.location,
        &mut listing.asking_price_text,
        &mut listing.cash_flow_text,
        &mut listing.revenue_text,
        &mut listing.employees_full_time,
        &mut listing.employees_part_time,
        &mut listing.description,
        &mut listing.years_in_business,
        &mut listing.is_franchise,
        &mut listing.reason_for_selling,
        &mut listing.sba_available,
        &mut listing.real_estate,
        &mut listing.listing_agent,
        &mut listing.absentee_owner,
    ] {
        *slot = slot.as_deref().and_then(present);
    }
    listing
}
