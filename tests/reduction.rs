// tests/reduction.rs
//
// Normalization and decimation of detector-count volumes.

use dld_volume::enums::{DataMode, ResolutionMode};
use dld_volume::{DecimationPolicy, IntensityReducer, Reduction, SkipReason, Volume};
use ndarray::{Array3, array, s};

#[test]
fn nonzero_input_reaches_255() {
    let mut data = array![[[0u16, 0, 0, 0], [0, 100, 0, 0], [0, 0, 200, 0], [0, 0, 0, 0]]];
    IntensityReducer::reduce(&mut data, DecimationPolicy::default());
    assert_eq!(data.iter().copied().max(), Some(255));

    let mut sparse = Array3::<u16>::zeros((3, 16, 16));
    sparse[[2, 5, 9]] = 3;
    IntensityReducer::reduce(&mut sparse, DecimationPolicy::default());
    assert_eq!(sparse[[2, 5, 9]], 255);
}

#[test]
fn all_zero_input_stays_blank() {
    let mut volume = Volume::zeros(2, 512, 512);
    match volume.reduce(DecimationPolicy::default()) {
        Reduction::Decimated(reduced) => {
            assert_eq!(reduced.dim(), (2, 128, 128));
            assert!(reduced.iter().all(|&v| v == 0));
        }
        Reduction::Skipped(reason) => panic!("unexpected skip: {reason}"),
    }
    assert!(volume.data().iter().all(|&v| v == 0));
}

#[test]
fn uniform_512_decimates_to_uniform_255() {
    let mut volume = Volume::new(Array3::from_elem((1, 512, 512), 37));
    volume.reduce(DecimationPolicy::default());
    let reduced = volume.reduced().expect("512x512 slices are decimated");
    assert_eq!(reduced.dim(), (1, 128, 128));
    assert!(reduced.iter().all(|&v| v == 255));
}

#[test]
fn global_max_is_taken_before_decimation() {
    let mut data = Array3::<u16>::zeros((2, 512, 512));
    data.slice_mut(s![0, .., ..]).fill(1000);
    data.slice_mut(s![1, .., ..]).fill(500);
    let mut volume = Volume::new(data);
    volume.reduce(DecimationPolicy::default());

    let reduced = volume.reduced().expect("decimated");
    assert_eq!(reduced[[0, 64, 64]], 255);
    assert_eq!(reduced[[1, 64, 64]], 128);
    assert_eq!(volume.data()[[1, 0, 0]], 128);
}

#[test]
fn block_sums_keep_spatial_layout() {
    let mut data = Array3::<u16>::zeros((1, 512, 512));
    // one bright 4x4 block at output cell (row 3, col 10)
    data.slice_mut(s![0, 12..16, 40..44]).fill(900);
    // one half-bright block at output cell (row 0, col 0)
    data.slice_mut(s![0, 0..4, 0..4]).fill(450);

    let mut volume = Volume::new(data);
    volume.reduce(DecimationPolicy::default());
    let reduced = volume.reduced().expect("decimated");
    assert_eq!(reduced[[0, 3, 10]], 255);
    assert_eq!(reduced[[0, 0, 0]], 128);
    assert_eq!(reduced[[0, 3, 11]], 0);
}

#[test]
fn non_square_input_passes_through() {
    // already spans 0..=255, so normalizing leaves it as is
    let data = Array3::from_shape_fn((1, 256, 512), |(_, y, x)| ((x + y) % 256) as u16);
    let before = data.clone();

    let mut volume = Volume::new(data);
    let reduction = volume.reduce(DecimationPolicy::default()).clone();
    assert_eq!(
        reduction,
        Reduction::Skipped(SkipReason::NotSquare {
            width: 512,
            height: 256
        })
    );
    assert_eq!(volume.data(), &before);
    assert_eq!(volume.display_dim(ResolutionMode::LowRes), (1, 256, 512));

    let plane = volume
        .get_plane(ResolutionMode::LowRes, DataMode::Xy, 0)
        .expect("slice 0");
    assert_eq!(plane.dim(), (256, 512));
    assert_eq!(plane[[10, 20]], 30);
}

#[test]
fn other_square_sizes_are_skipped() {
    let mut volume = Volume::new(Array3::from_elem((1, 256, 256), 4));
    let reduction = volume.reduce(DecimationPolicy::default()).clone();
    assert_eq!(
        reduction,
        Reduction::Skipped(SkipReason::UnsupportedSide {
            side: 256,
            expected: 512
        })
    );
    assert!(volume.data().iter().all(|&v| v == 255));
}
