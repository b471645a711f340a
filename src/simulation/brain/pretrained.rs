use super::super::error::SimError;
use super::{Controller, ControllerRecord, LevelRecord};

const LEVEL_0_BIASES: [f32; 6] = [
    0.400_794_77,
    -0.231_439_66,
    0.135_663_33,
    -0.000_500_595_8,
    -0.409_779_2,
    -0.076_874_12,
];

const LEVEL_0_WEIGHTS: [[f32; 6]; 5] = [
    [-0.221_897_05, 0.029_302_258, -0.037_617_15, -0.124_607_72, 0.400_561_2, -0.176_121_29],
    [0.278_322_02, 0.214_221_24, 0.268_155_45, -0.095_621_43, -0.081_105_42, -0.059_888_66],
    [0.166_063_19, 0.415_176_64, 0.104_942_88, 0.007_676_844, -0.016_970_69, -0.142_899_94],
    [-0.372_417_44, -0.005_739_986, -0.030_681_889, -0.063_899_51, -0.128_794_77, 0.078_371_79],
    [0.273_558_5, -0.147_893_24, 0.196_317_96, 0.236_209_64, 0.215_093_66, -0.239_457],
];

const LEVEL_1_BIASES: [f32; 4] = [0.201_528_82, 0.061_602_247, 0.070_864_11, 0.146_826_87];

const LEVEL_1_WEIGHTS: [[f32; 4]; 6] = [
    [0.018_432_051, -0.362_450_83, 0.095_286_07, 0.080_777_115],
    [0.141_618_48, -0.429_121_7, -0.044_459_93, -0.052_563_434],
    [0.050_465_82, -0.422_010_64, 0.078_840_89, 0.141_197_8],
    [0.256_999_58, 0.244_865_4, -0.242_919_1, 0.067_353_81],
    [0.352_234_08, 0.339_112_82, 0.227_342_33, -0.281_724_76],
    [-0.008_835_8, 0.015_661_58, -0.123_951_88, -0.146_061_55],
];

fn level<const I: usize, const O: usize>(biases: [f32; O], weights: [[f32; O]; I]) -> LevelRecord {
    LevelRecord {
        inputs: vec![0.0; I],
        outputs: vec![0.0; O],
        biases: biases.to_vec(),
        weights: weights.iter().map(|row| row.to_vec()).collect(),
    }
}

/// A `[5, 6, 4]` controller that already drives reasonably well.
pub fn pretrained() -> Result<Controller, SimError> {
    Controller::try_from(ControllerRecord {
        levels: vec![
            level(LEVEL_0_BIASES, LEVEL_0_WEIGHTS),
            level(LEVEL_1_BIASES, LEVEL_1_WEIGHTS),
        ],
    })
}
