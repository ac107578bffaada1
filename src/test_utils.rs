use crate::dataset::{Dataset, PipelineOptions};
use crate::models::*;
use crate::schema::{self, LoadOptions};

/// Header row of the deforestation source file.
pub(crate) const DEFORESTATION_HEADER: &str =
    "ano;estado;area;desmatado;incremento;floresta;nuvem;nao_observado;nao_floresta;hidrografia";

/// Small deforestation file. The 2009 row falls before the default cut-off.
pub(crate) const DEFORESTATION_CSV: &str = "\
ano;estado;area;desmatado;incremento;floresta;nuvem;nao_observado;nao_floresta;hidrografia
2009;Acre;164123;12345,5;167;140000,25;0,5;0;1200,5;300
2010;Acre;164123;12500;155,5;139800;0;0;1200,5;300
2010;Para;1247955;260000;3770;800000;1,5;12;50000;21000,75
2011;Acre;164123;12600;100;139700;0;0;1200,5;300
2011;Mato Grosso;903357;210000;1120;300000;0;0;380000;5000
";

/// Small meteorological file with several readings per (year, state) and the hyphenated
/// spelling of Mato Grosso.
pub(crate) const WEATHER_CSV: &str = "\
data;estado;precipitacao_total;estacao
2009-12-31;Acre;300;A101
2010-01-31;Acre;200;A101
2010-02-28;Acre;100,5;A101
2010-01-31;Para;250;A201
2011-01-31;Acre;180;A101
2011-01-31;Mato-Grosso;220;A901
2011-01-31;Roraima;90;A135
";

/// Create a DeforestationRecord with only the fields used by the pipeline set.
pub(crate) fn deforestation(year: i32, state: &str, increment: f64) -> DeforestationRecord {
    DeforestationRecord {
        year,
        state: state.to_string(),
        area: 0,
        deforested_area: 0.0,
        increment,
        forest_cover: 0.0,
        cloud_cover: 0.0,
    }
}

pub(crate) fn weather(year: i32, state: &str, total_precipitation: f64) -> WeatherRecord {
    WeatherRecord {
        year,
        state: state.to_string(),
        total_precipitation,
    }
}

pub(crate) fn raw_weather(date: &str, state: &str, total_precipitation: f64) -> RawWeatherRecord {
    RawWeatherRecord {
        date: date.to_string(),
        state: state.to_string(),
        total_precipitation,
    }
}

/// Create a Dataset from the fixture files.
///
/// Correlation rows: (2010, Acre, 155.5, 150.25), (2010, Para, 3770, 250),
/// (2011, Acre, 100, 180), (2011, Mato Grosso, 1120, 220).
pub(crate) fn get_test_dataset() -> Dataset {
    let options = LoadOptions::default();
    let deforestation = schema::load_from_reader(DEFORESTATION_CSV.as_bytes(), &options).unwrap();
    let weather = schema::load_from_reader(WEATHER_CSV.as_bytes(), &options).unwrap();
    Dataset::build(deforestation, weather, &PipelineOptions::default()).unwrap()
}
