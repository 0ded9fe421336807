/*
[INPUT]:  Local data directory
[OUTPUT]: JSON-backed stores for completions and the signed-in session
[POS]:    Persistence layer
[UPDATE]: When adding a new locally stored record
*/

pub mod storage;
