use chromashift::measure::{differentiation_summary, distance_summary};
use chromashift::opt::Options;
use chromashift::{ConfusionModel, Ellipse, LuminanceBand, Recolorer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Describe the observer
    let model = ConfusionModel::new(
        Ellipse::new([0.0, 0.0], 40.0, 10.0, 0.7),
        [0.0, 0.0],
        LuminanceBand::new(65.0, 35.0),
    )?;

    // 2. Paint a picture with red and green stripes on a white ground
    let mut pixels = Vec::with_capacity(32 * 32);
    for y in 0..32 {
        for x in 0..32 {
            pixels.push(match (y / 4 % 2, x < 28) {
                (_, false) => [250, 250, 250],
                (0, true) => [180, 90, 70],
                _ => [120, 130, 60],
            });
        }
    }

    // 3. Recolor it
    let recolorer = Recolorer::new(model.clone(), Options::default());
    let recoloring = recolorer.recolor(&pixels)?;

    let before = differentiation_summary(&recoloring.palette.colors(), &model);
    let after: Vec<_> = recoloring
        .replacements
        .entries()
        .iter()
        .map(|entry| entry.replacement)
        .collect();
    let after = differentiation_summary(&after, &model);
    let distance = distance_summary(&pixels, &recoloring.pixels)?;
    let resolution = recoloring.replacements.resolution();

    println!(
        "palette: {} colors with {} conflicts",
        recoloring.palette.len(),
        recoloring.conflicts
    );
    println!(
        "outcome: {} clear, {} resolved, {} unresolved",
        resolution.clear, resolution.resolved, resolution.unresolved
    );
    println!(
        "differentiation: mean {:.3} before, {:.3} after",
        before.mean, after.mean
    );
    println!(
        "pixel distance: mean {:.2}, median {:.2}, deviation {:.2}",
        distance.mean, distance.median, distance.deviation
    );

    Ok(())
}
