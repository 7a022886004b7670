use std::io;

use crate::resume::layout::{LayoutCursor, PageGeometry};
use crate::resume::metrics::wrap_text;
use crate::resume::renderer::{FontWeight, PageRenderer, PdfRenderer};
use crate::resume::{Degree, Project, Resume, Role, SkillColumn};

const BODY_SIZE: f64 = 11.0;
const ENTRY_TITLE_SIZE: f64 = 12.0;
const SECTION_SIZE: f64 = 16.0;
const SECTION_SPACING: f64 = 20.0;
const SECTION_RESERVE: f64 = 80.0;
const SECTION_RULE_LENGTH: f64 = 200.0;
const SECTION_RULE_THICKNESS: f64 = 0.75;
const BULLET_INDENT: f64 = 15.0;
const BULLET_RADIUS: f64 = 1.2;
const COLUMN_GAP: f64 = 15.0;

/// Lays content out top to bottom, breaking pages through the cursor.
pub struct ResumeLayout<R: PageRenderer> {
    renderer: R,
    cursor: LayoutCursor,
}

impl<R: PageRenderer> ResumeLayout<R> {
    pub fn new(renderer: R, geometry: PageGeometry) -> Self {
        ResumeLayout {
            renderer,
            cursor: LayoutCursor::new(geometry),
        }
    }

    pub fn cursor(&self) -> &LayoutCursor {
        &self.cursor
    }

    pub fn into_parts(self) -> (R, LayoutCursor) {
        (self.renderer, self.cursor)
    }

    fn geometry(&self) -> PageGeometry {
        *self.cursor.geometry()
    }

    fn break_page(&mut self) {
        self.cursor.new_page();
        self.renderer.new_page();
    }

    fn ensure_room(&mut self, required_height: f64) {
        if self.cursor.needs_page_break(required_height) {
            self.break_page();
        }
    }

    pub fn spacing(&mut self, points: f64) {
        self.cursor.advance_by(points);
    }

    pub fn add_text(&mut self, text: &str, size: f64, weight: FontWeight) {
        self.ensure_room(0.0);
        let margin = self.geometry().margin;
        self.renderer.text(text, margin, self.cursor.y(), size, weight);
        self.cursor.advance_by(self.geometry().line_height + size / 2.0);
    }

    pub fn add_section(&mut self, title: &str) {
        let geometry = self.geometry();
        self.cursor.advance_by(SECTION_SPACING);
        self.ensure_room(SECTION_RESERVE);

        self.renderer.text(&title.to_uppercase(), geometry.margin, self.cursor.y(), SECTION_SIZE, FontWeight::Bold);
        self.cursor.advance_by(geometry.line_height + 5.0);

        let rule_y = self.cursor.y() - 5.0;
        self.renderer.rule(geometry.margin, geometry.margin + SECTION_RULE_LENGTH, rule_y, SECTION_RULE_THICKNESS);
        self.cursor.advance_by(8.0);
    }

    /// Wrapped to the full content width. Long paragraphs may continue on
    /// the next page.
    pub fn add_paragraph(&mut self, text: &str, size: f64) {
        let geometry = self.geometry();
        for line in wrap_text(text, size, FontWeight::Regular, geometry.content_width()) {
            self.ensure_room(0.0);
            self.renderer.text(&line, geometry.margin, self.cursor.y(), size, FontWeight::Regular);
            self.cursor.advance(1);
        }
        self.cursor.advance_by(5.0);
    }

    /// A bullet is never split: if its wrapped lines do not all fit above the
    /// bottom margin it starts on a new page.
    pub fn add_bullet(&mut self, text: &str) {
        let geometry = self.geometry();
        let lines = wrap_text(text, BODY_SIZE, FontWeight::Regular, geometry.content_width() - 20.0);
        self.ensure_room(geometry.line_height * lines.len() as f64);
        self.draw_bullet_lines(geometry.margin, self.cursor.y(), &lines);
        self.cursor.advance(lines.len());
        self.cursor.advance_by(2.0);
    }

    fn draw_bullet_lines(&mut self, x: f64, y: f64, lines: &[String]) -> f64 {
        let line_height = self.geometry().line_height;
        self.renderer.bullet(x + 4.0, y - 3.0, BULLET_RADIUS);
        let mut line_y = y;
        for line in lines {
            self.renderer.text(line, x + BULLET_INDENT, line_y, BODY_SIZE, FontWeight::Regular);
            line_y += line_height;
        }
        line_y
    }

    /// Two independent columns side by side. Layout continues below the
    /// longer one.
    pub fn add_two_columns(&mut self, left: &SkillColumn, right: &SkillColumn) {
        let geometry = self.geometry();
        let col_width = (geometry.content_width() - COLUMN_GAP) / 2.0;
        let wrap_items = |column: &SkillColumn| -> Vec<Vec<String>> {
            column.items.iter()
                .map(|item| wrap_text(item, BODY_SIZE, FontWeight::Regular, col_width - BULLET_INDENT))
                .collect()
        };
        let left_items = wrap_items(left);
        let right_items = wrap_items(right);

        let column_height = |items: &Vec<Vec<String>>| {
            items.iter().map(|lines| lines.len()).sum::<usize>() as f64 * geometry.line_height
        };
        let title_height = geometry.line_height + 5.0;
        self.ensure_room(title_height + column_height(&left_items).max(column_height(&right_items)));

        let left_x = geometry.margin;
        let right_x = geometry.margin + col_width + COLUMN_GAP;
        let y = self.cursor.y();
        self.renderer.text(&left.title, left_x, y, ENTRY_TITLE_SIZE, FontWeight::Bold);
        self.renderer.text(&right.title, right_x, y, ENTRY_TITLE_SIZE, FontWeight::Bold);

        let start_y = y + title_height;
        let mut left_y = start_y;
        for lines in left_items.iter() {
            left_y = self.draw_bullet_lines(left_x, left_y, lines);
        }
        let mut right_y = start_y;
        for lines in right_items.iter() {
            right_y = self.draw_bullet_lines(right_x, right_y, lines);
        }

        self.cursor.move_to(left_y.max(right_y) + 10.0);
    }

    pub fn add_project(&mut self, project: &Project) {
        let geometry = self.geometry();
        let lines = wrap_text(&project.description, BODY_SIZE, FontWeight::Regular, geometry.content_width() - 5.0);
        self.ensure_room(geometry.line_height * (lines.len() + 1) as f64);

        self.renderer.text(&project.title, geometry.margin, self.cursor.y(), ENTRY_TITLE_SIZE, FontWeight::Bold);
        self.cursor.advance(1);
        for line in lines.iter() {
            self.renderer.text(line, geometry.margin + 5.0, self.cursor.y(), BODY_SIZE, FontWeight::Regular);
            self.cursor.advance(1);
        }
        self.cursor.advance_by(14.0);
    }

    /// Heading plus a dimmer second line, kept together.
    fn add_heading_pair(&mut self, title: &str, detail: &str, reserve: f64) {
        let geometry = self.geometry();
        self.ensure_room(reserve);
        self.renderer.text(title, geometry.margin, self.cursor.y(), ENTRY_TITLE_SIZE, FontWeight::Bold);
        self.cursor.advance(1);
        self.renderer.text(detail, geometry.margin, self.cursor.y(), BODY_SIZE, FontWeight::Regular);
        self.cursor.advance_by(geometry.line_height + 5.0);
    }

    pub fn add_role(&mut self, role: &Role) {
        let line_height = self.geometry().line_height;
        let detail = format!("{} | {}", role.organization, role.period);
        self.add_heading_pair(&role.role, &detail, line_height * 3.0 + 5.0);
        for highlight in role.highlights.iter() {
            self.add_bullet(highlight);
        }
        self.cursor.advance_by(10.0);
    }

    pub fn add_degree(&mut self, degree: &Degree) {
        let line_height = self.geometry().line_height;
        self.add_heading_pair(&degree.degree, &degree.school, line_height * 2.0);
    }
}

/// Lays the whole resume out on `renderer`.
pub fn compose<R: PageRenderer>(resume: &Resume, renderer: R, geometry: PageGeometry) -> ResumeLayout<R> {
    let mut layout = ResumeLayout::new(renderer, geometry);

    layout.add_text(&resume.name, 24.0, FontWeight::Bold);
    layout.add_text(&resume.headline, 16.0, FontWeight::Regular);
    layout.spacing(15.0);

    if !resume.contacts.is_empty() {
        layout.add_text(&resume.contacts.join(" | "), 10.0, FontWeight::Regular);
        layout.spacing(10.0);
    }

    if !resume.summary.is_empty() {
        layout.add_section("Professional Summary");
        for paragraph in resume.summary.iter() {
            layout.add_paragraph(paragraph, BODY_SIZE);
        }
        layout.spacing(5.0);
    }

    layout.add_section("Key Skills");
    layout.add_two_columns(&resume.skills.left, &resume.skills.right);

    if !resume.projects.is_empty() {
        layout.add_section("Key Projects");
        for project in resume.projects.iter() {
            layout.add_project(project);
        }
    }

    if !resume.experience.is_empty() {
        layout.add_section("Work Experience");
        for role in resume.experience.iter() {
            layout.add_role(role);
        }
    }

    if !resume.education.is_empty() {
        layout.add_section("Education");
        for degree in resume.education.iter() {
            layout.add_degree(degree);
        }
    }

    layout
}

pub fn render_resume_pdf(resume: &Resume) -> io::Result<Vec<u8>> {
    let geometry = PageGeometry::A4;
    let renderer = PdfRenderer::new(&format!("{} - Resume", resume.name), geometry)?;
    let (renderer, _cursor) = compose(resume, renderer, geometry).into_parts();
    renderer.finish()
}
