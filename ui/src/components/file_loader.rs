use anyhow::Result;
use widgetry::tools::{FutureLoader, PopupMsg};
use widgetry::{EventCtx, State};

use model::Trip;

use crate::{App, Transition};

/// Asks the user for a CSV file and replaces the current trip with it.
pub fn load_trip(ctx: &mut EventCtx) -> Transition {
    Transition::Push(pick_csv(
        ctx,
        Box::new(|ctx, app, maybe_bytes: Result<Option<Vec<u8>>>| {
            let maybe_trip = maybe_bytes
                .and_then(|maybe| maybe.map(|bytes| Trip::from_bytes(&bytes)).transpose());
            match maybe_trip {
                Ok(Some(trip)) => {
                    app.replace_trip(ctx, trip);
                    Transition::Multi(vec![Transition::Pop, Transition::Recreate])
                }
                // User didn't pick a file
                Ok(None) => Transition::Pop,
                Err(err) => {
                    error!("Couldn't load trip: {err:#}");
                    Transition::Replace(PopupMsg::new_state(
                        ctx,
                        "Couldn't load trip",
                        vec![format!("{err:#}")],
                    ))
                }
            }
        }),
    ))
}

fn pick_csv(
    ctx: &mut EventCtx,
    on_load: Box<dyn FnOnce(&mut EventCtx, &mut App, Result<Option<Vec<u8>>>) -> Transition>,
) -> Box<dyn State<App>> {
    let (_, outer_progress_rx) = futures_channel::mpsc::channel(1);
    let (_, inner_progress_rx) = futures_channel::mpsc::channel(1);
    FutureLoader::<App, Option<Vec<u8>>>::new_state(
        ctx,
        Box::pin(async move {
            let builder = rfd::AsyncFileDialog::new().add_filter("CSV", &["csv", "txt"]);
            let result = match builder.pick_file().await {
                Some(file) => Some(file.read().await),
                None => None,
            };
            let wrap: Box<dyn Send + FnOnce(&App) -> Option<Vec<u8>>> =
                Box::new(move |_: &App| result);
            Ok(wrap)
        }),
        outer_progress_rx,
        inner_progress_rx,
        "Waiting for a trip CSV to be chosen",
        on_load,
    )
}
