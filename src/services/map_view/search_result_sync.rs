use serde::Serialize;
use tracing::{debug, warn};

use super::{coordinate_converter::CoordinateConverter, map_screen::MapScreen};
use crate::types::place::{MapMarker, MarkerStyle, PlaceResult, SearchResponse};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub rendered: usize,
    pub skipped: usize,
}

pub fn summary_text(total: i64) -> String {
    format!("Search results: {}", total)
}

#[derive(Clone, Copy, Debug)]
pub struct SearchResultSync {
    converter: CoordinateConverter,
}

impl SearchResultSync {
    pub fn new(converter: CoordinateConverter) -> Self {
        Self { converter }
    }

    /// Builds one marker per item. Items whose coordinates do not parse are
    /// left out, but tags still follow item order so tag `i` is row `i`.
    pub fn build_markers(&self, items: &[PlaceResult]) -> (Vec<MapMarker>, usize) {
        let mut skipped = 0;

        let markers = items
            .iter()
            .enumerate()
            .filter_map(|(index, place)| {
                match self.converter.to_display(&place.native_x, &place.native_y) {
                    Ok(position) => Some(MapMarker {
                        position,
                        tag: index + 1,
                        style: MarkerStyle::HIGHLIGHTED,
                    }),
                    Err(e) => {
                        warn!("Skipping marker for {}: {}", place.name, e);
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();

        (markers, skipped)
    }

    /// Replaces the marker layer and the list with `response` wholesale.
    pub fn on_results(&self, response: SearchResponse, screen: &mut MapScreen) -> SyncReport {
        let (markers, skipped) = self.build_markers(&response.items);
        let report = SyncReport {
            rendered: markers.len(),
            skipped,
        };

        screen.map.markers = markers;
        screen.results.summary = summary_text(response.total);
        screen.results.places = response.items;
        screen.results.visible = true;

        debug!(
            "Rendered {} markers ({} skipped), total {}",
            report.rendered, report.skipped, response.total
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::map_view::coordinate_converter::CoordinateSystem;

    fn sync() -> SearchResultSync {
        SearchResultSync::new(CoordinateConverter::new(CoordinateSystem::Wgs84 {
            scale: 1.0,
        }))
    }

    fn place(index: usize, name: &str, x: &str, y: &str) -> PlaceResult {
        PlaceResult {
            name: name.to_string(),
            native_x: x.to_string(),
            native_y: y.to_string(),
            index,
        }
    }

    fn response(total: i64, items: Vec<PlaceResult>) -> SearchResponse {
        SearchResponse { total, items }
    }

    #[test]
    fn markers_follow_item_order() {
        let mut screen = MapScreen::default();

        let report = sync().on_results(
            response(
                3,
                vec![
                    place(0, "A", "127.0", "37.5"),
                    place(1, "B", "127.1", "37.6"),
                    place(2, "C", "127.2", "37.7"),
                ],
            ),
            &mut screen,
        );

        assert_eq!(report, SyncReport { rendered: 3, skipped: 0 });
        assert_eq!(
            screen.map.markers.iter().map(|m| m.tag).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            screen
                .results
                .places
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
        assert_eq!(screen.map.markers[1].position.lat, 37.6);
        assert_eq!(screen.map.markers[1].position.lng, 127.1);
        assert!(screen
            .map
            .markers
            .iter()
            .all(|m| m.style == MarkerStyle::HIGHLIGHTED));
        assert!(screen.results.visible);
    }

    #[test]
    fn new_results_replace_old_markers() {
        let mut screen = MapScreen::default();
        let sync = sync();

        sync.on_results(
            response(
                3,
                vec![
                    place(0, "A", "127.0", "37.5"),
                    place(1, "B", "127.1", "37.6"),
                    place(2, "C", "127.2", "37.7"),
                ],
            ),
            &mut screen,
        );
        sync.on_results(response(1, vec![place(0, "D", "126.9", "37.4")]), &mut screen);

        assert_eq!(screen.map.markers.len(), 1);
        assert_eq!(screen.map.markers[0].tag, 1);
        assert_eq!(screen.map.markers[0].position.lat, 37.4);
        assert_eq!(screen.results.places.len(), 1);
        assert_eq!(screen.results.places[0].name, "D");
    }

    #[test]
    fn summary_uses_reported_total() {
        let mut screen = MapScreen::default();

        sync().on_results(
            response(7, vec![place(0, "A", "127.0", "37.5")]),
            &mut screen,
        );

        assert_eq!(screen.results.summary, "Search results: 7");
        assert_eq!(screen.map.markers.len(), 1);
    }

    #[test]
    fn invalid_coordinates_skip_only_that_marker() {
        let mut screen = MapScreen::default();

        let report = sync().on_results(
            response(
                3,
                vec![
                    place(0, "A", "127.0", "37.5"),
                    place(1, "B", "abc", "37.6"),
                    place(2, "C", "127.2", "37.7"),
                ],
            ),
            &mut screen,
        );

        assert_eq!(report, SyncReport { rendered: 2, skipped: 1 });
        assert_eq!(
            screen.map.markers.iter().map(|m| m.tag).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(screen.results.places.len(), 3);
    }

    #[test]
    fn empty_results_clear_markers() {
        let mut screen = MapScreen::default();
        let sync = sync();

        sync.on_results(response(1, vec![place(0, "A", "127.0", "37.5")]), &mut screen);
        sync.on_results(response(0, vec![]), &mut screen);

        assert!(screen.map.markers.is_empty());
        assert!(screen.results.places.is_empty());
        assert_eq!(screen.results.summary, "Search results: 0");
    }
}
