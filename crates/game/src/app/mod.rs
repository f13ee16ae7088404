mod bootstrap;

use iso_engine::{run_app, AppError};

pub(crate) fn run() -> Result<(), AppError> {
    let wiring = bootstrap::build_app()?;
    run_app(wiring.config, wiring.sandbox, wiring.renderer)
}
