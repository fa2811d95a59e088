#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod components;
mod dashboard;
mod map;

use std::str::FromStr;

use abstutil::Timer;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use widgetry::{Canvas, Color, EventCtx, GfxCtx, Settings, SharedAppState};

use model::{Playback, SpeedSetting, Trip};

#[derive(StructOpt)]
struct Args {
    /// The path to a CSV file with `timestamp,latitude,longitude,speed` rows
    #[structopt(long, default_value = "data/vehicle-data.csv")]
    trip: String,
    /// Which map to draw underneath the trip: `vector` or `mapbox`
    #[structopt(long, default_value = "vector")]
    basemap: Basemap,
    /// An access token for the Mapbox basemap. If it's missing, you'll be asked for one.
    #[structopt(long)]
    mapbox_token: Option<String>,
}

impl Args {
    // TODO Only makes sense on native; the web build should fetch the default trip instead
    fn load(&self, _: &mut Timer) -> Result<Trip> {
        if cfg!(target_arch = "wasm32") {
            return Ok(Trip::empty());
        }
        if !std::path::Path::new(&self.trip).exists() {
            warn!("{} doesn't exist; starting with no trip", self.trip);
            return Ok(Trip::empty());
        }
        Trip::load_path(&self.trip)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Basemap {
    Vector,
    Mapbox,
}

impl FromStr for Basemap {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<Self> {
        match x {
            "vector" => Ok(Basemap::Vector),
            "mapbox" => Ok(Basemap::Mapbox),
            _ => bail!("Unknown basemap {x}; use vector or mapbox"),
        }
    }
}

fn run(settings: Settings) {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());

    widgetry::run(settings, move |ctx| {
        let (trip, load_error) = ctx.loading_screen("load trip", |_, timer| {
            match args.load(timer) {
                Ok(trip) => (trip, None),
                Err(err) => {
                    error!("Couldn't load {}: {err:#}", args.trip);
                    (Trip::empty(), Some(format!("{err:#}")))
                }
            }
        });

        let mut app = App::new(ctx, trip, args.basemap, args.mapbox_token.clone());
        if load_error.is_none() {
            app.restore_savestate(ctx);
        }

        let mut states = vec![dashboard::Dashboard::new_state(ctx, &app)];
        if app.needs_mapbox_token() {
            states.push(map::TokenPrompt::new_state(ctx));
        }
        if let Some(err) = load_error {
            states.push(widgetry::tools::PopupMsg::new_state(
                ctx,
                "Couldn't load trip",
                vec![err],
            ));
        }
        (app, states)
    });
}

pub fn main() {
    let settings = Settings::new("Trip Replay");
    run(settings);
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_wasm() {
    run(Settings::new("Trip Replay").root_dom_element_id("loading".to_string()));
}

pub struct App {
    trip: Trip,
    // Sticky across reloading the dashboard
    playback: Playback,

    basemap: Basemap,
    mapbox_token: Option<String>,
}

impl SharedAppState for App {
    fn draw_default(&self, g: &mut GfxCtx) {
        if cfg!(not(target_arch = "wasm32")) {
            g.clear(Color::BLACK);
        }
    }

    fn before_quit(&self, canvas: &Canvas) {
        let ss = Savestate {
            cam_zoom: canvas.cam_zoom,
            current_index: self.playback.current_index(),
            speed: self.playback.speed(),
        };
        abstio::write_json(SAVESTATE_PATH.to_string(), &ss);
    }
}

pub type Transition = widgetry::Transition<App>;

const SAVESTATE_PATH: &str = "data/save_trip.json";

impl App {
    pub fn new(
        ctx: &mut EventCtx,
        trip: Trip,
        basemap: Basemap,
        mapbox_token: Option<String>,
    ) -> Self {
        let bounds = &trip.bounds;
        ctx.canvas.map_dims = (bounds.max_x, bounds.max_y);
        ctx.canvas.center_on_map_pt(bounds.center());

        Self {
            trip,
            playback: Playback::new(),

            basemap,
            mapbox_token,
        }
    }

    /// Swap in a freshly loaded trip, keeping the basemap settings.
    pub fn replace_trip(&mut self, ctx: &mut EventCtx, trip: Trip) {
        let basemap = self.basemap;
        let mapbox_token = self.mapbox_token.take();
        *self = App::new(ctx, trip, basemap, mapbox_token);
    }

    pub fn needs_mapbox_token(&self) -> bool {
        self.basemap == Basemap::Mapbox && self.mapbox_token.is_none()
    }

    // This only makes sense on native, with the same trip used across different runs.
    // before_quit is never called on web, and web starts with an empty trip.
    fn restore_savestate(&mut self, ctx: &mut EventCtx) {
        if let Ok(savestate) = abstio::maybe_read_json::<Savestate>(
            SAVESTATE_PATH.to_string(),
            &mut Timer::throwaway(),
        ) {
            if let Some(playback) = savestate.playback(&self.trip) {
                // The dashboard recenters on the restored marker
                ctx.canvas.cam_zoom = savestate.cam_zoom;
                self.playback = playback;
                info!("Restored playback at sample {}", savestate.current_index);
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Savestate {
    cam_zoom: f64,
    current_index: usize,
    speed: SpeedSetting,
}

impl Savestate {
    /// Paused playback at the saved sample, if it still fits this trip.
    fn playback(&self, trip: &Trip) -> Option<Playback> {
        if trip.is_empty() {
            return None;
        }
        if self.current_index >= trip.len() {
            warn!(
                "Ignoring savestate at sample {}; this trip only has {}",
                self.current_index,
                trip.len()
            );
            return None;
        }
        Some(Playback::restore(&trip.samples, self.current_index, self.speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip() -> Trip {
        Trip::from_bytes(
            b"timestamp,latitude,longitude,speed\n\
              0,-33.8688,151.2093,0\n\
              5,-33.8680,151.2093,20\n\
              10,-33.8680,151.2110,35\n",
        )
        .unwrap()
    }

    #[test]
    fn test_savestate_only_keeps_zoom() {
        let ss = Savestate {
            cam_zoom: 2.5,
            current_index: 1,
            speed: SpeedSetting::Double,
        };
        let json = abstutil::to_json(&ss);
        assert!(!json.contains("cam_x"), "{json}");
        assert!(!json.contains("cam_y"), "{json}");
        assert!(json.contains("cam_zoom"), "{json}");
    }

    #[test]
    fn test_older_savestate_still_restores() {
        let ss: Savestate = abstutil::from_json(
            br#"{"cam_x": 10.0, "cam_y": 20.0, "cam_zoom": 1.5, "current_index": 2, "speed": "Half"}"#,
        )
        .unwrap();
        let playback = ss.playback(&trip()).unwrap();
        assert_eq!(playback.current_index(), 2);
        assert_eq!(playback.speed(), SpeedSetting::Half);
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_savestate_out_of_range() {
        let ss = Savestate {
            cam_zoom: 1.0,
            current_index: 3,
            speed: SpeedSetting::Normal,
        };
        assert!(ss.playback(&trip()).is_none());
        assert!(ss.playback(&Trip::empty()).is_none());
    }
}
