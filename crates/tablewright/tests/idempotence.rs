//! Rebuilding from the same parameters gives the same model.

use proptest::prelude::*;
use tablewright::{build_table, init_kernel, to_stl_bytes, FurnitureParameters, Style, TableType};

fn params() -> impl Strategy<Value = FurnitureParameters> {
    (
        prop::sample::select(Style::ALL.to_vec()),
        prop::bool::ANY,
        36.0f64..96.0,
        24.0f64..48.0,
        26.0f64..34.0,
    )
        .prop_map(|(style, trestle, length, width, height)| {
            let mut p = FurnitureParameters::preset(style);
            if trestle {
                p.table_type = TableType::Trestle;
            }
            p.length = length;
            p.width = width;
            p.height = height;
            p
        })
}

// Each case builds and cuts two whole tables; turned legs dominate the
// cost, so the case count stays small.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    #[test]
    fn same_parameters_same_closed_model(p in params()) {
        init_kernel();
        let a = build_table(&p);
        let b = build_table(&p);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(to_stl_bytes(&a), to_stl_bytes(&b));

        prop_assert!(a.diagnostics.geometry.is_empty(), "{:?}", a.diagnostics.geometry);
        for part in &a.parts {
            let report = part.mesh.validate();
            prop_assert!(report.is_ok(), "{}: {:?}", part.id, report);
        }
    }
}
