pub mod reqres_stub;
