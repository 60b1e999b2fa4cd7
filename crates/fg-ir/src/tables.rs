//! Bulk waveform lookup tables, one period per table.
//!
//! Generated offline; 255 entries each so that the interpolating reader
//! in [`crate::wavetable`] wraps on a non-power-of-two stride.

/// One period of a sine wave.
pub static SINE: [f32; 255] = [
    0.0, 0.02463745, 0.04925994, 0.07385253, 0.09840028, 0.1228883,
    0.1473017, 0.1716257, 0.1958455, 0.2199464, 0.2439137, 0.267733,
    0.2913897, 0.3148696, 0.3381583, 0.3612417, 0.3841057, 0.4067366,
    0.4291206, 0.4512441, 0.4730936, 0.4946558, 0.5159178, 0.5368666,
    0.5574894, 0.5777738, 0.5977075, 0.6172782, 0.6364742, 0.6552839,
    0.6736956, 0.6916984, 0.7092813, 0.7264336, 0.7431448, 0.7594049,
    0.775204, 0.7905324, 0.8053809, 0.8197405, 0.8336024, 0.8469582,
    0.8597999, 0.8721195, 0.8839097, 0.8951633, 0.9058734, 0.9160336,
    0.9256377, 0.9346798, 0.9431544, 0.9510565, 0.9583812, 0.9651241,
    0.971281, 0.9768483, 0.9818226, 0.9862007, 0.9899802, 0.9931587,
    0.9957342, 0.9977052, 0.9990705, 0.9998293, 0.999981, 0.9995257,
    0.9984636, 0.9967953, 0.9945219, 0.9916447, 0.9881655, 0.9840863,
    0.9794098, 0.9741386, 0.968276, 0.9618256, 0.9547913, 0.9471774,
    0.9389884, 0.9302293, 0.9209055, 0.9110226, 0.9005867, 0.889604,
    0.8780812, 0.8660254, 0.8534438, 0.8403441, 0.8267342, 0.8126224,
    0.7980172, 0.7829276, 0.7673627, 0.7513319, 0.734845, 0.7179119,
    0.700543, 0.6827489, 0.6645402, 0.6459281, 0.6269238, 0.6075389,
    0.5877853, 0.5676747, 0.5472195, 0.5264322, 0.5053252, 0.4839114,
    0.4622039, 0.4402157, 0.4179603, 0.3954512, 0.372702, 0.3497265,
    0.3265387, 0.3031527, 0.2795826, 0.2558428, 0.2319476, 0.2079117,
    0.1837495, 0.1594758, 0.1351052, 0.1106527, 0.08613294, 0.06156091,
    0.0369515, 0.01231966, -0.01231966, -0.0369515, -0.06156091, -0.08613294,
    -0.1106527, -0.1351052, -0.1594758, -0.1837495, -0.2079117, -0.2319476,
    -0.2558428, -0.2795826, -0.3031527, -0.3265387, -0.3497265, -0.372702,
    -0.3954512, -0.4179603, -0.4402157, -0.4622039, -0.4839114, -0.5053252,
    -0.5264322, -0.5472195, -0.5676747, -0.5877853, -0.6075389, -0.6269238,
    -0.6459281, -0.6645402, -0.6827489, -0.700543, -0.7179119, -0.734845,
    -0.7513319, -0.7673627, -0.7829276, -0.7980172, -0.8126224, -0.8267342,
    -0.8403441, -0.8534438, -0.8660254, -0.8780812, -0.889604, -0.9005867,
    -0.9110226, -0.9209055, -0.9302293, -0.9389884, -0.9471774, -0.9547913,
    -0.9618256, -0.968276, -0.9741386, -0.9794098, -0.9840863, -0.9881655,
    -0.9916447, -0.9945219, -0.9967953, -0.9984636, -0.9995257, -0.999981,
    -0.9998293, -0.9990705, -0.9977052, -0.9957342, -0.9931587, -0.9899802,
    -0.9862007, -0.9818226, -0.9768483, -0.971281, -0.9651241, -0.9583812,
    -0.9510565, -0.9431544, -0.9346798, -0.9256377, -0.9160336, -0.9058734,
    -0.8951633, -0.8839097, -0.8721195, -0.8597999, -0.8469582, -0.8336024,
    -0.8197405, -0.8053809, -0.7905324, -0.775204, -0.7594049, -0.7431448,
    -0.7264336, -0.7092813, -0.6916984, -0.6736956, -0.6552839, -0.6364742,
    -0.6172782, -0.5977075, -0.5777738, -0.5574894, -0.5368666, -0.5159178,
    -0.4946558, -0.4730936, -0.4512441, -0.4291206, -0.4067366, -0.3841057,
    -0.3612417, -0.3381583, -0.3148696, -0.2913897, -0.267733, -0.2439137,
    -0.2199464, -0.1958455, -0.1716257, -0.1473017, -0.1228883, -0.09840028,
    -0.07385253, -0.04925994, -0.02463745,
];

/// One period of a square wave (naive, band-unlimited).
pub static SQUARE: [f32; 255] = [
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0,
];

/// One period of a rising sawtooth spanning [-1, 1].
pub static SAW: [f32; 255] = [
    -1.0, -0.992126, -0.984252, -0.976378, -0.9685039, -0.9606299,
    -0.9527559, -0.9448819, -0.9370079, -0.9291339, -0.9212598, -0.9133858,
    -0.9055118, -0.8976378, -0.8897638, -0.8818898, -0.8740157, -0.8661417,
    -0.8582677, -0.8503937, -0.8425197, -0.8346457, -0.8267717, -0.8188976,
    -0.8110236, -0.8031496, -0.7952756, -0.7874016, -0.7795276, -0.7716535,
    -0.7637795, -0.7559055, -0.7480315, -0.7401575, -0.7322835, -0.7244094,
    -0.7165354, -0.7086614, -0.7007874, -0.6929134, -0.6850394, -0.6771654,
    -0.6692913, -0.6614173, -0.6535433, -0.6456693, -0.6377953, -0.6299213,
    -0.6220472, -0.6141732, -0.6062992, -0.5984252, -0.5905512, -0.5826772,
    -0.5748031, -0.5669291, -0.5590551, -0.5511811, -0.5433071, -0.5354331,
    -0.5275591, -0.519685, -0.511811, -0.503937, -0.496063, -0.488189,
    -0.480315, -0.4724409, -0.4645669, -0.4566929, -0.4488189, -0.4409449,
    -0.4330709, -0.4251969, -0.4173228, -0.4094488, -0.4015748, -0.3937008,
    -0.3858268, -0.3779528, -0.3700787, -0.3622047, -0.3543307, -0.3464567,
    -0.3385827, -0.3307087, -0.3228346, -0.3149606, -0.3070866, -0.2992126,
    -0.2913386, -0.2834646, -0.2755906, -0.2677165, -0.2598425, -0.2519685,
    -0.2440945, -0.2362205, -0.2283465, -0.2204724, -0.2125984, -0.2047244,
    -0.1968504, -0.1889764, -0.1811024, -0.1732283, -0.1653543, -0.1574803,
    -0.1496063, -0.1417323, -0.1338583, -0.1259843, -0.1181102, -0.1102362,
    -0.1023622, -0.09448819, -0.08661417, -0.07874016, -0.07086614, -0.06299213,
    -0.05511811, -0.04724409, -0.03937008, -0.03149606, -0.02362205, -0.01574803,
    -0.007874016, 0.0, 0.007874016, 0.01574803, 0.02362205, 0.03149606,
    0.03937008, 0.04724409, 0.05511811, 0.06299213, 0.07086614, 0.07874016,
    0.08661417, 0.09448819, 0.1023622, 0.1102362, 0.1181102, 0.1259843,
    0.1338583, 0.1417323, 0.1496063, 0.1574803, 0.1653543, 0.1732283,
    0.1811024, 0.1889764, 0.1968504, 0.2047244, 0.2125984, 0.2204724,
    0.2283465, 0.2362205, 0.2440945, 0.2519685, 0.2598425, 0.2677165,
    0.2755906, 0.2834646, 0.2913386, 0.2992126, 0.3070866, 0.3149606,
    0.3228346, 0.3307087, 0.3385827, 0.3464567, 0.3543307, 0.3622047,
    0.3700787, 0.3779528, 0.3858268, 0.3937008, 0.4015748, 0.4094488,
    0.4173228, 0.4251969, 0.4330709, 0.4409449, 0.4488189, 0.4566929,
    0.4645669, 0.4724409, 0.480315, 0.488189, 0.496063, 0.503937,
    0.511811, 0.519685, 0.5275591, 0.5354331, 0.5433071, 0.5511811,
    0.5590551, 0.5669291, 0.5748031, 0.5826772, 0.5905512, 0.5984252,
    0.6062992, 0.6141732, 0.6220472, 0.6299213, 0.6377953, 0.6456693,
    0.6535433, 0.6614173, 0.6692913, 0.6771654, 0.6850394, 0.6929134,
    0.7007874, 0.7086614, 0.7165354, 0.7244094, 0.7322835, 0.7401575,
    0.7480315, 0.7559055, 0.7637795, 0.7716535, 0.7795276, 0.7874016,
    0.7952756, 0.8031496, 0.8110236, 0.8188976, 0.8267717, 0.8346457,
    0.8425197, 0.8503937, 0.8582677, 0.8661417, 0.8740157, 0.8818898,
    0.8897638, 0.8976378, 0.9055118, 0.9133858, 0.9212598, 0.9291339,
    0.9370079, 0.9448819, 0.9527559, 0.9606299, 0.9685039, 0.976378,
    0.984252, 0.992126, 1.0,
];
