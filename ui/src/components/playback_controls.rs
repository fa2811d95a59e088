use widgetry::{
    include_labeled_bytes, EventCtx, GfxCtx, HorizontalAlignment, Key, Line, Outcome, Panel,
    Slider, Text, VerticalAlignment, Widget,
};

use model::{Action, SpeedSetting};

use crate::App;

/// Play/pause, reset, speed, and the progress slider. The truth lives in `app.playback`; this
/// just turns input into actions and keeps the panel in sync.
pub struct PlaybackControls {
    pub panel: Panel,
    index: usize,
    playing: bool,
    speed: SpeedSetting,
}

impl PlaybackControls {
    pub fn new(ctx: &mut EventCtx, app: &App) -> Self {
        let mut controls = Self {
            panel: Panel::new_builder(Widget::col(vec![
                Widget::placeholder(ctx, "clock"),
                Slider::area(
                    ctx,
                    0.3 * ctx.canvas.window_width,
                    app.playback.progress_percent(app.trip.len()) / 100.0,
                    "progress",
                ),
                Widget::placeholder(ctx, "controls"),
            ]))
            .aligned(HorizontalAlignment::Left, VerticalAlignment::Bottom)
            .build(ctx),
            index: app.playback.current_index(),
            playing: app.playback.is_playing(),
            speed: app.playback.speed(),
        };
        controls.update_controls(ctx, app);
        controls
    }

    fn update_controls(&mut self, ctx: &mut EventCtx, app: &App) {
        self.on_index_change(ctx, app);

        let mut row = Vec::new();
        row.push({
            let button = ctx
                .style()
                .btn_plain
                .icon_bytes(include_labeled_bytes!("../../assets/play.svg"))
                .hotkey(Key::Space);

            Widget::custom_row(vec![if self.playing {
                button
                    .image_bytes(include_labeled_bytes!("../../assets/pause.svg"))
                    .build_widget(ctx, "pause")
            } else {
                button.build_widget(ctx, "play")
            }])
            .margin_right(16)
        });

        row.push(
            ctx.style()
                .btn_plain
                .icon_bytes(include_labeled_bytes!("../../assets/reset.svg"))
                .hotkey(Key::X)
                .build_widget(ctx, "reset")
                .margin_right(16),
        );

        row.push(Widget::custom_row(
            SpeedSetting::ALL
                .into_iter()
                .map(|s| {
                    let mut txt = Text::from(Line(format!("{} speed", s.label())).small());
                    txt.extend(Text::tooltip(ctx, Key::LeftArrow, "slow down"));
                    txt.extend(Text::tooltip(ctx, Key::RightArrow, "speed up"));

                    let style = if s == self.speed {
                        &ctx.style().btn_solid
                    } else {
                        &ctx.style().btn_outline
                    };
                    style
                        .text(s.label())
                        .tooltip(txt)
                        .build_widget(ctx, s.label())
                        .margin_right(4)
                })
                .collect(),
        ));

        self.panel.replace(ctx, "controls", Widget::custom_row(row));
    }

    fn on_index_change(&mut self, ctx: &mut EventCtx, app: &App) {
        let txt = match (app.trip.samples.get(self.index), app.trip.time_span()) {
            (Some(sample), Some((start, end))) => {
                let mut txt = Text::from(
                    Line(format!("{:.0}s / {:.0}s", sample.timestamp - start, end - start))
                        .big_monospaced(),
                );
                txt.add_line(
                    Line(format!("Sample {} of {}", self.index + 1, app.trip.len())).secondary(),
                );
                txt
            }
            _ => Text::from(Line("No data").big_monospaced()),
        };
        self.panel.replace(ctx, "clock", txt.into_widget(ctx));

        self.panel
            .slider_mut("progress")
            .set_percent(ctx, app.playback.progress_percent(app.trip.len()) / 100.0);
    }

    // Updates app.playback
    pub fn event(&mut self, ctx: &mut EventCtx, app: &mut App) {
        let mut actions = Vec::new();
        match self.panel.event(ctx) {
            Outcome::Clicked(x) => match x.as_ref() {
                "play" | "pause" => {
                    actions.push(Action::TogglePlay);
                }
                "reset" => {
                    actions.push(Action::Reset);
                }
                x => match SpeedSetting::ALL.into_iter().find(|s| s.label() == x) {
                    Some(speed) => actions.push(Action::SetSpeed(speed)),
                    None => unreachable!(),
                },
            },
            Outcome::Changed(x) => match x.as_ref() {
                "progress" => {
                    let percent = self.panel.slider("progress").get_percent() * 100.0;
                    actions.push(Action::Scrub(percent));
                }
                _ => unreachable!(),
            },
            _ => {}
        }

        if ctx.input.pressed(Key::LeftArrow) {
            match app.playback.speed().slower() {
                Some(speed) => actions.push(Action::SetSpeed(speed)),
                None => actions.push(Action::Pause),
            }
        }
        if ctx.input.pressed(Key::RightArrow) {
            if !app.playback.is_playing() {
                actions.push(Action::Play);
            } else if let Some(speed) = app.playback.speed().faster() {
                actions.push(Action::SetSpeed(speed));
            }
        }

        for action in actions {
            app.playback.apply(&app.trip.samples, action);
        }

        if app.playback.is_playing() {
            if let Some(real_dt) = ctx.input.nonblocking_is_update_event() {
                ctx.input.use_update_event();
                app.playback.advance(&app.trip.samples, real_dt);
            }
        }

        self.sync(ctx, app);
    }

    fn sync(&mut self, ctx: &mut EventCtx, app: &App) {
        let index = app.playback.current_index();
        if self.playing != app.playback.is_playing() || self.speed != app.playback.speed() {
            self.index = index;
            self.playing = app.playback.is_playing();
            self.speed = app.playback.speed();
            self.update_controls(ctx, app);
        } else if self.index != index {
            self.index = index;
            self.on_index_change(ctx, app);
        }
    }

    pub fn draw(&self, g: &mut GfxCtx) {
        self.panel.draw(g);
    }
}
