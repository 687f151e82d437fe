use std::sync::{Condvar, Mutex};

/*
  収束リダクション（全ワーカーのlocal_dtの最大値）

  Mutex + Condvar による all-reduce。最後に到着したワーカーが
  結果を確定して世代カウンタを進め、待っている全員を起こす。
  全員の寄与が揃うまで誰も先へ進めないので、この呼び出し自体が
  完全なバリアを兼ねる。
*/

pub struct MaxReducer {
    workers: usize,
    state: Mutex<ReduceState>,
    cond: Condvar,
}

struct ReduceState {
    pending: usize,  // まだ到着していないワーカー数
    acc: f64,        // 今回の折り畳み途中の最大値
    result: f64,     // 直近に確定したグローバル最大値
    generation: u64, // 確定のたびに進む世代番号
}

impl MaxReducer {
    pub fn new(workers: usize) -> Self {
        MaxReducer {
            workers,
            state: Mutex::new(ReduceState {
                pending: workers,
                acc: 0.0,
                result: 0.0,
                generation: 0,
            }),
            cond: Condvar::new(),
        }
    }

    /// local を寄与して、全員分が揃ったグローバル最大値を受け取る
    pub fn reduce(&self, local: f64) -> f64 {
        let mut st = self.state.lock().unwrap();

        st.acc = st.acc.max(local);
        st.pending -= 1;

        if st.pending == 0 {
            // 最後の到着者: 結果を確定し、次ラウンド用にリセットして全員を起こす
            st.result = st.acc;
            st.acc = 0.0;
            st.pending = self.workers;
            st.generation += 1;
            self.cond.notify_all();
            st.result
        } else {
            let generation = st.generation;
            while st.generation == generation {
                st = self.cond.wait(st).unwrap();
            }
            st.result
        }
    }
}
