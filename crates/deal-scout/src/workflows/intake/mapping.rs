use super::text::normalize_header;
use crate::workflows::acquisition::domain::RawListing;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Raw listing field a CSV column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListingField {
    Id,
    Title,
    Url,
    Industry,
    Location,
    AskingPrice,
    CashFlow,
    Revenue,
    EmployeesFullTime,
    EmployeesPartTime,
    Description,
    YearsInBusiness,
    IsFranchise,
    ReasonForSelling,
    SbaAvailable,
    RealEstate,
    ListingAgent,
    AbsenteeOwner,
}

impl ListingField {
    pub(crate) fn assign(self, listing: &mut RawListing, value: String) {
        let slot = match self {
            ListingField::Id => {
                listing.id = value;
                return;
            }
            ListingField::Title => &mut listing.title,
            ListingField::Url => &mut listing.url,
            ListingField::Industry => &mut listing.industry,
            ListingField::Location => &mut listing.location,
            ListingField::AskingPrice => &mut listing.asking_price_text,
            ListingField::CashFlow => &mut listing.cash_flow_text,
            ListingField::Revenue => &mut listing.revenue_text,
            ListingField::EmployeesFullTime => &mut listing.employees_full_time,
            ListingField::EmployeesPartTime => &mut listing.employees_part_time,
            ListingField::Description => &mut listing.description,
            ListingField::YearsInBusiness => &mut listing.years_in_business,
            ListingField::IsFranchise => &mut listing.is_franchise,
            ListingField::ReasonForSelling => &mut listing.reason_for_selling,
            ListingField::SbaAvailable => &mut listing.sba_available,
            ListingField::RealEstate => &mut listing.real_estate,
            ListingField::ListingAgent => &mut listing.listing_agent,
            ListingField::AbsenteeOwner => &mut listing.absentee_owner,
        };
        *slot = Some(value);
    }
}

static HEADER_MAP: OnceLock<HashMap<String, ListingField>> = OnceLock::new();

pub(crate) fn field_for_header(header: &str) -> Option<ListingField> {
    header_map().get(&normalize_header(header)).copied()
}

fn header_map() -> &'static HashMap<String, ListingField> {
    HEADER_MAP.get_or_init(|| {
        const HEADER_TO_FIELD: &[(&str, ListingField)] = &[
            // Identity
            ("id", ListingField::Id),
            ("id_number", ListingField::Id),
            ("listing id", ListingField::Id),
            ("listing_id", ListingField::Id),
            ("title", ListingField::Title),
            ("business name", ListingField::Title),
            ("url", ListingField::Url),
            ("detail_url", ListingField::Url),
            ("listing url", ListingField::Url),
            // Profile
            ("industry", ListingField::Industry),
            ("category", ListingField::Industry),
            ("location", ListingField::Location),
            ("description", ListingField::Description),
            ("business description", ListingField::Description),
            ("years_in_business", ListingField::YearsInBusiness),
            ("years in business", ListingField::YearsInBusiness),
            ("is_franchise", ListingField::IsFranchise),
            ("is this a franchise", ListingField::IsFranchise),
            ("franchise", ListingField::IsFranchise),
            ("reason_for_selling", ListingField::ReasonForSelling),
            ("reason for selling", ListingField::ReasonForSelling),
            ("real_estate", ListingField::RealEstate),
            ("real estate", ListingField::RealEstate),
            ("listing_agent", ListingField::ListingAgent),
            ("listing agent", ListingField::ListingAgent),
            ("absentee_owner", ListingField::AbsenteeOwner),
            ("absentee_owner_field", ListingField::AbsenteeOwner),
            ("absentee owner", ListingField::AbsenteeOwner),
            // Financials
            ("asking_price_text", ListingField::AskingPrice),
            ("asking price", ListingField::AskingPrice),
            ("business price", ListingField::AskingPrice),
            ("price", ListingField::AskingPrice),
            ("cash_flow_text", ListingField::CashFlow),
            ("cash flow", ListingField::CashFlow),
            ("sde (cash flow)", ListingField::CashFlow),
            ("sde", ListingField::CashFlow),
            ("revenue_text", ListingField::Revenue),
            ("revenue", ListingField::Revenue),
            ("gross revenue", ListingField::Revenue),
            ("sba_available", ListingField::SbaAvailable),
            ("sba financing", ListingField::SbaAvailable),
            ("sba available", ListingField::SbaAvailable),
            // Staffing
            ("employees_full_time", ListingField::EmployeesFullTime),
            ("employees_ft", ListingField::EmployeesFullTime),
            ("employees (full-time)", ListingField::EmployeesFullTime),
            ("full-time employees", ListingField::EmployeesFullTime),
            ("employees_part_time", ListingField::EmployeesPartTime),
            ("employees_pt", ListingField::EmployeesPartTime),
            ("employees (part-time)", ListingField::EmployeesPartTime),
            ("part-time employees", ListingField::EmployeesPartTime),
        ];

        let mut map = HashMap::with_capacity(HEADER_TO_FIELD.len());
        for (header, field) in HEADER_TO_FIELD {
            map.insert(normalize_header(header), *field);
        }
        map
    })
}
