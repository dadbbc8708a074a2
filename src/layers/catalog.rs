//! OpenStreetMap layers fetched per frame key for high-zoom frames.

use crate::foundation::core::MAX_NATURAL_EARTH_ZOOM;
use crate::layers::style::{LayerStyle, styles};
use crate::spatial::geojson::GeometryType;

/// Query string that selects the local OSM water shapefile instead of Overpass.
pub const OCEANS_FROM_FILE: &str = "oceans from file";

/// One OSM-derived layer: a query, the geometry kinds it yields and its style.
/// `style.min_zoom` is the lowest zoom at which the layer is fetched and drawn.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverpassLayerDefinition {
    pub layer_name: String,
    #[serde(flatten)]
    pub style: LayerStyle,
    pub overpass_query: String,
    pub valid_geometries: Vec<GeometryType>,
}

impl OverpassLayerDefinition {
    fn new(
        layer_name: &str,
        min_zoom: f64,
        style: LayerStyle,
        query: &str,
        valid: &[GeometryType],
    ) -> Self {
        Self {
            layer_name: layer_name.to_owned(),
            style: LayerStyle {
                min_zoom: Some(min_zoom),
                ..style
            },
            overpass_query: query.to_owned(),
            valid_geometries: valid.to_vec(),
        }
    }

    pub fn min_zoom(&self) -> f64 {
        self.style.min_zoom.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn accepts(&self, g: GeometryType) -> bool {
        self.valid_geometries.contains(&g)
    }
}

const LINES: &[GeometryType] = &[GeometryType::LineString, GeometryType::MultiLineString];
const AREAS: &[GeometryType] = &[GeometryType::Polygon, GeometryType::MultiPolygon];
const ANY: &[GeometryType] = &[
    GeometryType::Polygon,
    GeometryType::MultiPolygon,
    GeometryType::LineString,
    GeometryType::MultiLineString,
];

/// The OSM layers drawn above the Natural Earth zoom threshold.
pub fn overpass_layer_definitions() -> Vec<OverpassLayerDefinition> {
    use OverpassLayerDefinition as D;
    let ne = MAX_NATURAL_EARTH_ZOOM;
    vec![
        D::new(
            "major ferries",
            ne,
            styles::ferry(),
            "(
      way[route=ferry][motor_vehicle=yes];
      relation[route=ferry][motor_vehicle=yes];
    );",
            LINES,
        ),
        D::new(
            "minor ferries",
            12.0,
            styles::ferry(),
            "(
      way[route=ferry][!motor_vehicle];
      way[route=ferry][motor_vehicle!=yes];
      relation[route=ferry][!motor_vehicle];
      relation[route=ferry][motor_vehicle!=yes];
    );",
            LINES,
        ),
        D::new(
            "railway",
            ne,
            styles::railroads(),
            "(
      way[railway=rail][!tunnel];
      relation[railway=rail][!tunnel];
    );",
            LINES,
        ),
        D::new(
            "motorways",
            ne,
            styles::motorway_road(),
            r#"( nwr[highway~"motorway|motorway_link"]; );"#,
            LINES,
        ),
        D::new(
            "major roads",
            11.0,
            styles::major_road(),
            r#"( nwr[highway~"trunk|primary|trunk_link|primary_link"]; );"#,
            LINES,
        ),
        D::new(
            "minor roads",
            12.0,
            styles::main_road(),
            r#"( nwr[highway~"secondary|tertiary|secondary_link|tertiary_link"]; );"#,
            LINES,
        ),
        D::new(
            "residential roads",
            13.0,
            styles::residential_road(),
            r#"( nwr[highway~"unclassified|residential|living_street|service"]; );"#,
            LINES,
        ),
        D::new(
            "tracks",
            14.0,
            styles::track_road(),
            "( nwr[highway=track]; nwr[highway=pedestrian]; );",
            LINES,
        ),
        D::new(
            "paths",
            15.0,
            styles::path_road(),
            "(
      way[highway=path];
      way[highway=bridleway];
      way[highway=steps];
      way[highway=footway];
      relation[highway=path];
      relation[highway=bridleway];
      relation[highway=steps];
      relation[highway=footway];
    );",
            LINES,
        ),
        D::new(
            "forest",
            ne,
            styles::forests(),
            "( nwr[natural=wood]; nwr[landuse=forest]; );",
            AREAS,
        ),
        D::new("oceans and seas", ne, styles::lakes(), OCEANS_FROM_FILE, AREAS),
        D::new(
            "large water bodies",
            ne,
            styles::lakes(),
            r#"(
      way[natural=water][!water];
      way[natural=bay];
      way[natural=water][water~"lake|river|oxbow|cenote|basin"];
      relation[natural=water][!water];
      relation[natural=bay];
      relation[natural=water][water~"lake|river|oxbow|cenote|basin"];
    );"#,
            AREAS,
        ),
        D::new(
            "small water bodies",
            12.0,
            styles::lakes(),
            r#"(
      way[natural=water][water~"stream|stream_pool|rapids|canal|lock|pond|reflecting_pool|reservoir|waste_water|moat|harbour"];
      relation[natural=water][water~"stream|stream_pool|rapids|canal|lock|pond|reflecting_pool|reservoir|waste_water|moat|harbour"];
    );"#,
            AREAS,
        ),
        D::new(
            "rivers",
            ne,
            styles::rivers(),
            "(
      way[waterway=river];
      relation[waterway=river];
    );",
            LINES,
        ),
        D::new(
            "streams",
            10.0,
            styles::rivers(),
            "(
      way[waterway=stream][!tunnel];
      way[waterway=canal][!tunnel];
      way[waterway=tidal_channel];
      relation[waterway=stream][!tunnel];
      relation[waterway=canal][!tunnel];
      relation[waterway=tidal_channel];
    );",
            LINES,
        ),
        D::new(
            "other waterways",
            12.0,
            styles::rivers(),
            "(
      way[waterway=drain][!tunnel];
      way[waterway=ditch][!tunnel];
      relation[waterway=drain][!tunnel];
      relation[waterway=ditch][!tunnel];
    );",
            LINES,
        ),
        D::new(
            "urban areas",
            ne,
            styles::urban_areas(),
            r#"(
      way[landuse~"commercial|construction|education|fairground|industrial|residential|retail|institutional"];
      relation[landuse~"commercial|construction|education|fairground|industrial|residential|retail|institutional"];
    );"#,
            AREAS,
        ),
        D::new(
            "agriculture",
            ne,
            styles::agricultural(),
            r#"(
      way[landuse~"allotments|farmland|farmyard|paddy|animal_keeping|flowerbed|orchard|plant_nursery|vineyard"];
      relation[landuse~"allotments|farmland|farmyard|paddy|animal_keeping|flowerbed|orchard|plant_nursery|vineyard"];
    );"#,
            AREAS,
        ),
        D::new(
            "park",
            ne,
            styles::park(),
            r#"(
      way[landuse~"recreation_ground|village_green|cemetery"];
      way[leisure~"garden|park"];
      relation[landuse~"recreation_ground|village_green|cemetery"];
      relation[leisure~"garden|park"];
    );"#,
            AREAS,
        ),
        D::new(
            "special areas",
            ne,
            styles::special_urban_areas(),
            "(
      way[landuse=military];
      way[aerodrome];
      relation[landuse=military];
      relation[aerodrome];
    );",
            AREAS,
        ),
        D::new(
            "buildings",
            14.0,
            styles::buildings(),
            "(
      way[building](if:is_closed());
      relation[building](if:is_closed());
    );",
            AREAS,
        ),
        D::new(
            "admin 0 boundaries",
            ne,
            styles::admin0_border(),
            "(
      way[boundary=administrative][admin_level=2];
      relation[boundary=administrative][admin_level=2];
    );",
            ANY,
        ),
        D::new(
            "admin 0 contested boundaries",
            ne,
            styles::admin0_contested_border(),
            "(
      way[boundary=disputed];
      relation[boundary=disputed];
    );",
            ANY,
        ),
        D::new(
            "admin 1 boundaries",
            ne,
            styles::admin1_border(),
            "(
      way[boundary=administrative][admin_level=4];
      relation[boundary=administrative][admin_level=4];
    );",
            ANY,
        ),
        D::new(
            "admin 2 boundaries",
            12.0,
            styles::admin2_border(),
            "(
      way[boundary=administrative][admin_level=5];
      relation[boundary=administrative][admin_level=5];
    );",
            ANY,
        ),
        D::new(
            "admin 3 boundaries",
            15.0,
            styles::admin2_border(),
            "(
      way[boundary=administrative][admin_level=6];
      relation[boundary=administrative][admin_level=6];
    );",
            ANY,
        ),
        D::new(
            "protected areas",
            ne,
            styles::national_parks(),
            "(
      way[boundary=protected_area](if:is_closed());
      relation[boundary=protected_area](if:is_closed());
    );",
            AREAS,
        ),
        D::new(
            "glaciers",
            ne,
            styles::glaciated_areas(),
            "(
      way[natural=glacier];
      relation[natural=glacier];
    );",
            AREAS,
        ),
        D::new(
            "reefs",
            ne,
            styles::reefs(),
            "(
      way[natural=reef];
      relation[natural=reef];
    );",
            ANY,
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/layers/catalog.rs"]
mod tests;
