mod mapbox;

use geom::{Bounds, Circle, Distance, PolyLine, Pt2D};
use widgetry::{Color, Drawable, EventCtx, GeomBatch, GfxCtx};

pub use self::mapbox::{MapboxMap, TokenPrompt};
use crate::{App, Basemap};

/// Something that can show a trip on a map. Every basemap draws the same things on top; they
/// differ in what's underneath.
pub trait MapBackend {
    fn name(&self) -> &'static str;

    /// The full route, drawn faintly. Only called once per trip.
    fn render_route(&mut self, ctx: &mut EventCtx, route: &[Pt2D]);
    /// The part of the route traveled so far
    fn render_trail(&mut self, ctx: &mut EventCtx, trail: &[Pt2D]);
    fn set_marker_position(&mut self, ctx: &mut EventCtx, pos: Pt2D);
    fn pan_to(&mut self, ctx: &mut EventCtx, pos: Pt2D);

    /// Called on every event, after the camera may have moved
    fn sync_camera(&mut self, _: &mut EventCtx) {}

    fn draw(&self, g: &mut GfxCtx);
}

pub fn new_backend(ctx: &mut EventCtx, app: &App) -> Box<dyn MapBackend> {
    let mut map: Box<dyn MapBackend> = match app.basemap {
        Basemap::Vector => Box::new(VectorMap::new(ctx, &app.trip.bounds)),
        Basemap::Mapbox => Box::new(MapboxMap::new(
            ctx,
            app.trip.gps_bounds.clone(),
            app.mapbox_token.clone(),
        )),
    };
    map.render_route(ctx, &app.trip.route);
    info!("Drawing the trip with the {} basemap", map.name());
    map
}

const ROUTE_COLOR: &str = "#21D3F5";

/// The route, trail, and vehicle marker. Shared by every backend.
pub struct TripLayers {
    route: Drawable,
    trail: Drawable,
    marker: Drawable,
}

impl TripLayers {
    pub fn new(ctx: &mut EventCtx) -> Self {
        Self {
            route: Drawable::empty(ctx),
            trail: Drawable::empty(ctx),
            marker: Drawable::empty(ctx),
        }
    }

    pub fn render_route(&mut self, ctx: &mut EventCtx, route: &[Pt2D]) {
        self.route = draw_line(ctx, route, Distance::meters(3.0), 0.3);
    }

    pub fn render_trail(&mut self, ctx: &mut EventCtx, trail: &[Pt2D]) {
        self.trail = draw_line(ctx, trail, Distance::meters(4.0), 0.8);
    }

    pub fn set_marker_position(&mut self, ctx: &mut EventCtx, pos: Pt2D) {
        let radius = Distance::meters(16.0);
        let mut batch = GeomBatch::new();
        batch.push(Color::hex(ROUTE_COLOR), Circle::new(pos, radius).to_polygon());
        if let Ok(outline) = Circle::new(pos, radius).to_outline(Distance::meters(3.0)) {
            batch.push(Color::hex("#0B0F14"), outline);
        }
        self.marker = ctx.upload(batch);
    }

    pub fn draw(&self, g: &mut GfxCtx) {
        g.redraw(&self.route);
        g.redraw(&self.trail);
        g.redraw(&self.marker);
    }
}

fn draw_line(ctx: &mut EventCtx, pts: &[Pt2D], width: Distance, alpha: f32) -> Drawable {
    let mut batch = GeomBatch::new();
    // The vehicle often sits still between samples
    let pts = Pt2D::approx_dedupe(pts.to_vec(), Distance::meters(1.0));
    if let Ok(pl) = PolyLine::new(pts) {
        batch.push(Color::hex(ROUTE_COLOR).alpha(alpha), pl.make_polygons(width));
    }
    ctx.upload(batch)
}

/// No tiles, no credentials. Just the trip over a dark background.
pub struct VectorMap {
    background: Drawable,
    layers: TripLayers,
}

impl VectorMap {
    pub fn new(ctx: &mut EventCtx, bounds: &Bounds) -> Self {
        let background = ctx.upload(GeomBatch::from(vec![(
            Color::grey(0.1),
            bounds.get_rectangle(),
        )]));
        Self {
            background,
            layers: TripLayers::new(ctx),
        }
    }
}

impl MapBackend for VectorMap {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn render_route(&mut self, ctx: &mut EventCtx, route: &[Pt2D]) {
        self.layers.render_route(ctx, route);
    }

    fn render_trail(&mut self, ctx: &mut EventCtx, trail: &[Pt2D]) {
        self.layers.render_trail(ctx, trail);
    }

    fn set_marker_position(&mut self, ctx: &mut EventCtx, pos: Pt2D) {
        self.layers.set_marker_position(ctx, pos);
    }

    fn pan_to(&mut self, ctx: &mut EventCtx, pos: Pt2D) {
        ctx.canvas.center_on_map_pt(pos);
    }

    fn draw(&self, g: &mut GfxCtx) {
        g.clear(Color::BLACK);
        g.redraw(&self.background);
        self.layers.draw(g);
    }
}
