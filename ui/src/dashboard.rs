use geom::Pt2D;
use widgetry::{
    EventCtx, GfxCtx, HorizontalAlignment, Line, Outcome, Panel, State, UpdateType,
    VerticalAlignment, Widget,
};

use model::{Action, TripStats};

use crate::components::{load_trip, stats, PlaybackControls};
use crate::map::{new_backend, MapBackend};
use crate::{App, Transition};

/// The one screen: the map, the playback controls, and the stats.
pub struct Dashboard {
    panel: Panel,
    controls: PlaybackControls,
    map: Box<dyn MapBackend>,
    // Which sample and how much trail is currently drawn
    drawn: (usize, usize),
}

impl Dashboard {
    pub fn new_state(ctx: &mut EventCtx, app: &App) -> Box<dyn State<App>> {
        let contents = if app.trip.is_empty() {
            stats::no_data(ctx)
        } else {
            Widget::col(vec![
                Widget::placeholder(ctx, "gauge"),
                Widget::placeholder(ctx, "stats"),
                stats::speed_chart(ctx, &app.trip),
            ])
        };

        let mut state = Self {
            panel: Panel::new_builder(Widget::col(vec![
                Widget::row(vec![
                    Widget::col(vec![
                        Line("Vehicle Tracker").small_heading().into_widget(ctx),
                        Line("Trip replay and analytics")
                            .secondary()
                            .into_widget(ctx),
                    ]),
                    ctx.style()
                        .btn_outline
                        .text("Load trip")
                        .build_def(ctx)
                        .align_right(),
                ]),
                contents,
            ]))
            .aligned(HorizontalAlignment::Right, VerticalAlignment::Top)
            .build(ctx),
            controls: PlaybackControls::new(ctx, app),
            map: new_backend(ctx, app),
            drawn: (0, 0),
        };
        state.on_index_change(ctx, app);
        Box::new(state)
    }

    fn on_index_change(&mut self, ctx: &mut EventCtx, app: &App) {
        let index = app.playback.current_index();
        self.drawn = (index, app.playback.trail().len());

        let trail: Vec<Pt2D> = app
            .playback
            .trail()
            .iter()
            .map(|ll| ll.to_pt(&app.trip.gps_bounds))
            .collect();
        self.map.render_trail(ctx, &trail);

        let sample = match app.trip.samples.get(index) {
            Some(sample) => sample,
            None => return,
        };
        let pos = app.trip.route[index];
        self.map.set_marker_position(ctx, pos);
        self.map.pan_to(ctx, pos);

        let gauge = stats::speed_gauge(ctx, sample.speed);
        self.panel.replace(ctx, "gauge", gauge);
        let grid = stats::stat_grid(ctx, &TripStats::at(&app.trip.samples, index));
        self.panel.replace(ctx, "stats", grid);
    }
}

impl State<App> for Dashboard {
    fn event(&mut self, ctx: &mut EventCtx, app: &mut App) -> Transition {
        ctx.canvas_movement();
        self.map.sync_camera(ctx);

        self.controls.event(ctx, app);
        if self.drawn != (app.playback.current_index(), app.playback.trail().len()) {
            self.on_index_change(ctx, app);
        }

        if let Outcome::Clicked(x) = self.panel.event(ctx) {
            match x.as_ref() {
                "Load trip" => {
                    app.playback.apply(&app.trip.samples, Action::Pause);
                    return load_trip(ctx);
                }
                _ => unreachable!(),
            }
        }

        if app.playback.is_playing() {
            ctx.request_update(UpdateType::Game);
        }

        Transition::Keep
    }

    fn draw(&self, g: &mut GfxCtx, _: &App) {
        self.map.draw(g);
        self.controls.draw(g);
        self.panel.draw(g);
    }

    fn recreate(&mut self, ctx: &mut EventCtx, app: &mut App) -> Box<dyn State<App>> {
        Self::new_state(ctx, app)
    }
}
