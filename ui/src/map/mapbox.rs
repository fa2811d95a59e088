use geom::{Bounds, GPSBounds, Pt2D};
use widgetry::{
    Color, EventCtx, GfxCtx, HorizontalAlignment, Key, Line, Outcome, Panel, State, TextBox, TextExt,
    VerticalAlignment, Widget,
};

use super::{MapBackend, TripLayers};
use crate::{App, Basemap, Transition};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = window)]
    fn set_mapbox_token(token: &str);
    #[wasm_bindgen(js_namespace = window)]
    fn sync_mapbox_canvas(lon1: f64, lat1: f64, lon2: f64, lat2: f64);
}

/// Mapbox tiles, drawn by the host page underneath the widgetry canvas. Only the web build has
/// tiles; natively this draws the trip over nothing.
pub struct MapboxMap {
    #[allow(unused)]
    gps_bounds: GPSBounds,
    token: Option<String>,
    layers: TripLayers,
    // Avoid syncing when bounds match
    last_bounds: Bounds,
}

impl MapboxMap {
    pub fn new(ctx: &mut EventCtx, gps_bounds: GPSBounds, token: Option<String>) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(ref token) = token {
                set_mapbox_token(token);
            }
        }
        if cfg!(not(target_arch = "wasm32")) {
            warn!("Mapbox tiles are only drawn on the web");
        }

        Self {
            gps_bounds,
            token,
            layers: TripLayers::new(ctx),
            last_bounds: Bounds::new(),
        }
    }
}

impl MapBackend for MapboxMap {
    fn name(&self) -> &'static str {
        "mapbox"
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
        self.sync_camera(ctx);
    }

    fn sync_camera(&mut self, ctx: &mut EventCtx) {
        if self.token.is_none() {
            return;
        }
        // This method is usually called for every single event, but the camera hasn't always
        // moved
        let bounds = ctx.canvas.get_screen_bounds();
        if self.last_bounds == bounds {
            return;
        }
        self.last_bounds = bounds;

        #[cfg(target_arch = "wasm32")]
        {
            let pt1 = Pt2D::new(self.last_bounds.min_x, self.last_bounds.min_y)
                .to_gps(&self.gps_bounds);
            let pt2 = Pt2D::new(self.last_bounds.max_x, self.last_bounds.max_y)
                .to_gps(&self.gps_bounds);
            sync_mapbox_canvas(pt1.x(), pt1.y(), pt2.x(), pt2.y());
        }
    }

    fn draw(&self, g: &mut GfxCtx) {
        // Without a token, nothing gets drawn at all
        if self.token.is_some() {
            self.layers.draw(g);
        }
    }
}

/// Blocks the dashboard until a Mapbox access token is entered.
pub struct TokenPrompt {
    panel: Panel,
}

impl TokenPrompt {
    pub fn new_state(ctx: &mut EventCtx) -> Box<dyn State<App>> {
        Box::new(Self {
            panel: Panel::new_builder(Widget::col(vec![
                Line("Mapbox access token").small_heading().into_widget(ctx),
                "The Mapbox basemap needs a token before it can draw anything.".text_widget(ctx),
                TextBox::widget(ctx, "token", String::new(), true, 40),
                Widget::placeholder(ctx, "error"),
                Widget::row(vec![
                    ctx.style()
                        .btn_solid
                        .text("Use token")
                        .hotkey(Key::Enter)
                        .build_def(ctx),
                    ctx.style()
                        .btn_outline
                        .text("Use the vector basemap instead")
                        .build_def(ctx),
                ]),
            ]))
            .aligned(HorizontalAlignment::Center, VerticalAlignment::Center)
            .build(ctx),
        })
    }
}

impl State<App> for TokenPrompt {
    fn event(&mut self, ctx: &mut EventCtx, app: &mut App) -> Transition {
        if let Outcome::Clicked(x) = self.panel.event(ctx) {
            match x.as_ref() {
                "Use token" => {
                    let token = self.panel.text_box("token").trim().to_string();
                    if token.is_empty() {
                        let msg = Line("Enter a token first").fg(Color::RED).into_widget(ctx);
                        self.panel.replace(ctx, "error", msg);
                        return Transition::Keep;
                    }
                    app.mapbox_token = Some(token);
                    return Transition::Multi(vec![Transition::Pop, Transition::Recreate]);
                }
                "Use the vector basemap instead" => {
                    app.basemap = Basemap::Vector;
                    return Transition::Multi(vec![Transition::Pop, Transition::Recreate]);
                }
                _ => unreachable!(),
            }
        }

        Transition::Keep
    }

    fn draw(&self, g: &mut GfxCtx, _: &App) {
        self.panel.draw(g);
    }
}
