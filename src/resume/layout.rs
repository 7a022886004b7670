/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub line_height: f64,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width: 595.28,
        height: 841.89,
        margin: 50.0,
        line_height: 14.0,
    };

    pub fn content_width(&self) -> f64 {
        self.width - self.margin * 2.0
    }

    /// Lowest baseline text may sit on.
    pub fn bottom(&self) -> f64 {
        self.height - self.margin
    }
}

/// Vertical position of the next baseline, measured from the top edge of the
/// current page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    geometry: PageGeometry,
    y: f64,
    page: usize,
}

impl LayoutCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        LayoutCursor {
            geometry,
            y: geometry.margin,
            page: 1,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// 1-based number of the current page, which is also the page count so far.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn advance(&mut self, lines: usize) {
        self.y += self.geometry.line_height * lines as f64;
    }

    pub fn advance_by(&mut self, points: f64) {
        self.y += points;
    }

    /// Used to resume below the longer of two columns.
    pub fn move_to(&mut self, y: f64) {
        self.y = y;
    }

    pub fn needs_page_break(&self, required_height: f64) -> bool {
        self.y + required_height > self.geometry.bottom()
    }

    pub fn new_page(&mut self) {
        self.page += 1;
        self.y = self.geometry.margin;
    }
}
