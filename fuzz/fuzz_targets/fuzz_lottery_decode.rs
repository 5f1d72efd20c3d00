#![no_main]

use libfuzzer_sys::fuzz_target;
use veildraw_core::accounts::LotteryAccount;

fuzz_target!(|data: &[u8]| {
    if let Ok(lottery) = LotteryAccount::decode(data) {
        let encoded = lottery.encode();
        assert_eq!(encoded.as_slice(), data);
        let again = LotteryAccount::decode(&encoded).expect("re-decode");
        assert_eq!(again, lottery);
    }
});
