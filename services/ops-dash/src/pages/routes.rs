// services/ops-dash/src/pages/routes.rs
//
// Route reports: a second instance of the report catalog, scoped to the
// per-corridor reporting the routes view surfaces

use ratatui::prelude::*;

use crate::pages::reports::ReportsModel;
use crate::ui::Palette;

pub struct RoutesPage {
    pub model: ReportsModel,
}

impl RoutesPage {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            model: ReportsModel::new(interval_ms),
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        self.model.draw(frame, area, "ROUTE REPORTS", pal);
    }
}
