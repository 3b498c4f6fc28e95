//! Overpass QL generation from relation configuration
//!
//! The remote client treats query text as opaque; these builders are the
//! only place the query language appears.

/// Offset that turns a map-database relation id into an Overpass area id.
const AREA_ID_OFFSET: u64 = 3_600_000_000;

/// Per-query server-side timeout, seconds.
const QUERY_TIMEOUT: u32 = 425;

/// Query for the named streets of one area, one name per output row.
pub fn streets_query(area_id: u64) -> String {
    format!(
        "[out:csv(name; false)][timeout:{timeout}];\n\
         area({area})->.searchArea;\n\
         way[\"highway\"][\"name\"](area.searchArea);\n\
         out;",
        timeout = QUERY_TIMEOUT,
        area = AREA_ID_OFFSET + area_id,
    )
}

/// Query for the addressed objects of one area, street and number per row.
pub fn housenumbers_query(area_id: u64) -> String {
    format!(
        "[out:csv(\"addr:street\", \"addr:housenumber\"; false)][timeout:{timeout}];\n\
         area({area})->.searchArea;\n\
         nwr[\"addr:street\"][\"addr:housenumber\"](area.searchArea);\n\
         out;",
        timeout = QUERY_TIMEOUT,
        area = AREA_ID_OFFSET + area_id,
    )
}
